//! Prescriber snapshots keyed by medication ID.

use super::{Database, DbResult, PRESCRIBER_KEY_PREFIX};
use crate::models::{DoctorRecord, PrescriberLink, RecordId};

/// Storage key for a medication's prescriber snapshot.
pub fn prescriber_key(medication_id: &RecordId) -> String {
    format!("{}{}", PRESCRIBER_KEY_PREFIX, medication_id)
}

impl Database {
    /// Get the prescriber snapshot for a medication. Unreadable entries are
    /// reported as absent.
    pub fn get_prescriber(&self, medication_id: &RecordId) -> DbResult<Option<PrescriberLink>> {
        let Some(raw) = self.get_item(&prescriber_key(medication_id))? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Store a prescriber snapshot for a medication.
    pub fn save_prescriber(&self, medication_id: &RecordId, link: &PrescriberLink) -> DbResult<()> {
        let json = serde_json::to_string(link)?;
        self.set_item(&prescriber_key(medication_id), &json)
    }

    /// Remove a medication's prescriber snapshot.
    pub fn remove_prescriber(&self, medication_id: &RecordId) -> DbResult<bool> {
        self.remove_item(&prescriber_key(medication_id))
    }

    /// All readable snapshots with their medication IDs.
    pub fn list_prescribers(&self) -> DbResult<Vec<(RecordId, PrescriberLink)>> {
        let mut links = Vec::new();
        for key in self.keys_with_prefix(PRESCRIBER_KEY_PREFIX)? {
            let medication_id = RecordId::new(&key[PRESCRIBER_KEY_PREFIX.len()..]);
            if let Some(link) = self.get_prescriber(&medication_id)? {
                links.push((medication_id, link));
            }
        }
        Ok(links)
    }

    /// Rewrite every snapshot taken from `doctor` with its current name and
    /// specialty. Snapshots without a source doctor are left untouched.
    ///
    /// Returns the number of snapshots rewritten.
    pub fn refresh_prescribers_for(&self, doctor: &DoctorRecord) -> DbResult<usize> {
        let mut refreshed = 0;
        for (medication_id, link) in self.list_prescribers()? {
            if link.doctor_id.as_ref() != Some(&doctor.id) {
                continue;
            }
            let updated = PrescriberLink::from(doctor);
            if updated != link {
                self.save_prescriber(&medication_id, &updated)?;
                refreshed += 1;
            }
        }
        Ok(refreshed)
    }
}
