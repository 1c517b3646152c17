//! List reconciliation.
//!
//! A fetched collection becomes the rendered list by dropping repeated ids
//! (first occurrence wins). The server is known to return the same record
//! twice on some joins; the duplicates are kept aside for diagnostics.

use std::collections::HashSet;

use crate::models::{DoctorRecord, MedicationRecord, RecordId};

/// A record with a server-assigned identity.
pub trait Keyed {
    fn key(&self) -> &RecordId;
}

impl Keyed for MedicationRecord {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for DoctorRecord {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T> {
    /// Unique records in server order
    pub items: Vec<T>,
    /// Dropped repeats, in the order they were seen
    pub duplicates: Vec<T>,
}

/// Deduplicate by id, keeping the first occurrence of each.
pub fn reconcile<T: Keyed>(raw: Vec<T>) -> Reconciled<T> {
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(raw.len());
    let mut items = Vec::with_capacity(raw.len());
    let mut duplicates = Vec::new();

    for record in raw {
        if seen.insert(record.key().clone()) {
            items.push(record);
        } else {
            tracing::warn!(id = %record.key(), "duplicate record in response, dropping");
            duplicates.push(record);
        }
    }

    Reconciled { items, duplicates }
}

/// Stable sort by the raw time string.
///
/// Comparison is lexicographic, so a bare `08:00` and a full
/// `2026-10-17 07:00:00` do not order by clock time. Records without a time
/// sort first.
pub fn sort_by_time(records: &mut [MedicationRecord]) {
    records.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
}

/// Page-scoped list of one record kind.
///
/// Only [`RecordList::replace`] writes it; everything else reads.
#[derive(Debug, Clone)]
pub struct RecordList<T> {
    items: Vec<T>,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> RecordList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a reconciled fetch. Returns how many
    /// duplicates were dropped.
    pub fn replace(&mut self, raw: Vec<T>) -> usize {
        let reconciled = reconcile(raw);
        self.items = reconciled.items;
        reconciled.duplicates.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|r| r.key() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicationStatus;
    use proptest::prelude::*;

    fn med(id: i64, name: &str) -> MedicationRecord {
        MedicationRecord::new(id, name, "10mg")
    }

    #[test]
    fn test_first_occurrence_wins() {
        let raw = vec![
            med(1, "first"),
            med(2, "other"),
            med(1, "second"),
            med(1, "third"),
        ];

        let reconciled = reconcile(raw);
        let names: Vec<_> = reconciled.items.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["first", "other"]);
        assert_eq!(reconciled.duplicates.len(), 2);
        assert_eq!(reconciled.duplicates[0].name, "second");
    }

    #[test]
    fn test_empty_input() {
        let reconciled = reconcile::<MedicationRecord>(Vec::new());
        assert!(reconciled.items.is_empty());
        assert!(reconciled.duplicates.is_empty());
    }

    #[test]
    fn test_sort_is_lexicographic_and_stable() {
        let mut records = vec![
            med(1, "evening").with_time("2026-10-17 22:00:00"),
            med(2, "bare").with_time("21:00"),
            med(3, "untimed"),
            med(4, "morning").with_time("2026-10-17 07:00:00"),
            med(5, "untimed too"),
        ];
        sort_by_time(&mut records);

        let names: Vec<_> = records.iter().map(|m| m.name.as_str()).collect();
        // "21:00" > "2026-..." as strings, so it lands after 22:00
        assert_eq!(
            names,
            vec!["untimed", "untimed too", "morning", "evening", "bare"]
        );
    }

    #[test]
    fn test_record_list_replace_and_find() {
        let mut list = RecordList::new();
        let dropped = list.replace(vec![
            med(1, "A").with_status(MedicationStatus::Pending),
            med(1, "A again"),
            med(2, "B").with_status(MedicationStatus::Completed),
        ]);

        assert_eq!(dropped, 1);
        assert_eq!(list.len(), 2);
        assert_eq!(list.find(&RecordId::from(1)).unwrap().name, "A");
        assert!(list.find(&RecordId::from(9)).is_none());

        list.replace(Vec::new());
        assert!(list.is_empty());
    }

    #[test]
    fn test_doctors_reconcile_too() {
        let reconciled = reconcile(vec![
            DoctorRecord::new(3, "Dr. Adams"),
            DoctorRecord::new(3, "Dr. Adams"),
        ]);
        assert_eq!(reconciled.items.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_each_id_exactly_once_in_first_seen_order(ids in prop::collection::vec(0i64..8, 0..40)) {
            let raw: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(pos, id)| med(*id, &pos.to_string()))
                .collect();

            let reconciled = reconcile(raw);

            let mut expected: Vec<(i64, usize)> = Vec::new();
            for (pos, id) in ids.iter().enumerate() {
                if !expected.iter().any(|(seen, _)| seen == id) {
                    expected.push((*id, pos));
                }
            }
            let actual: Vec<(String, String)> = reconciled
                .items
                .iter()
                .map(|m| (m.id.to_string(), m.name.clone()))
                .collect();
            let expected: Vec<(String, String)> = expected
                .iter()
                .map(|(id, pos)| (id.to_string(), pos.to_string()))
                .collect();

            prop_assert_eq!(actual, expected);
            prop_assert_eq!(reconciled.items.len() + reconciled.duplicates.len(), ids.len());
        }
    }
}
