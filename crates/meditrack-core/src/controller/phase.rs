//! Per-record mutation phases.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::models::RecordId;

/// Where a record stands relative to the server.
///
/// Mutations are blocking, so the pending phases only last for the duration
/// of one call. Between calls a record is `Absent` or `Persisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordPhase {
    Absent,
    PendingCreate,
    Persisted,
    PendingUpdate,
    PendingDelete,
}

/// Input to the phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    BeginCreate,
    BeginUpdate,
    BeginDelete,
    Succeeded,
    Failed,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("illegal transition: {event:?} from {from:?}")]
pub struct PhaseError {
    pub from: RecordPhase,
    pub event: PhaseEvent,
}

impl RecordPhase {
    pub fn apply(self, event: PhaseEvent) -> Result<RecordPhase, PhaseError> {
        use PhaseEvent::*;
        use RecordPhase::*;

        let next = match (self, event) {
            (Absent, BeginCreate) => PendingCreate,
            (PendingCreate, Succeeded) => Persisted,
            (PendingCreate, Failed) => Absent,
            (Persisted, BeginUpdate) => PendingUpdate,
            (Persisted, BeginDelete) => PendingDelete,
            (PendingUpdate, Succeeded | Failed) => Persisted,
            (PendingDelete, Succeeded) => Absent,
            (PendingDelete, Failed) => Persisted,
            (from, event) => return Err(PhaseError { from, event }),
        };
        Ok(next)
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            RecordPhase::PendingCreate | RecordPhase::PendingUpdate | RecordPhase::PendingDelete
        )
    }
}

/// Which record a phase belongs to. New records have no id until the
/// server assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Medication(RecordId),
    Doctor(RecordId),
    NewMedication,
    NewDoctor,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Medication(id) => write!(f, "medication:{}", id),
            RecordKey::Doctor(id) => write!(f, "doctor:{}", id),
            RecordKey::NewMedication => f.write_str("medication:new"),
            RecordKey::NewDoctor => f.write_str("doctor:new"),
        }
    }
}

/// Phases of every record the page has touched. Records never seen are
/// `Absent`.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    phases: HashMap<RecordKey, RecordPhase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, key: &RecordKey) -> RecordPhase {
        self.phases.get(key).copied().unwrap_or(RecordPhase::Absent)
    }

    /// Apply an event. An illegal transition leaves the phase unchanged.
    pub fn apply(&mut self, key: &RecordKey, event: PhaseEvent) -> Result<RecordPhase, PhaseError> {
        let from = self.phase(key);
        let next = from.apply(event)?;
        tracing::debug!(record = %key, ?from, ?next, "phase transition");
        if next == RecordPhase::Absent {
            self.phases.remove(key);
        } else {
            self.phases.insert(key.clone(), next);
        }
        Ok(next)
    }

    /// Mark freshly loaded records as persisted and forget settled records
    /// that are no longer listed. `kind` builds the key for an id.
    pub fn sync<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a RecordId>,
        kind: fn(RecordId) -> RecordKey,
    ) {
        let listed: Vec<RecordKey> = ids.into_iter().map(|id| kind(id.clone())).collect();
        let probe = kind(RecordId::new(""));
        self.phases.retain(|key, phase| {
            std::mem::discriminant(key) != std::mem::discriminant(&probe)
                || phase.is_pending()
                || listed.contains(key)
        });
        for key in listed {
            self.phases.entry(key).or_insert(RecordPhase::Persisted);
        }
    }

    /// Finish a successful create, moving the phase to the server-assigned
    /// id when the response carried one.
    pub fn settle_create(&mut self, new_key: &RecordKey, key: Option<RecordKey>) {
        self.phases.remove(new_key);
        if let Some(key) = key {
            tracing::debug!(record = %key, "created");
            self.phases.insert(key, RecordPhase::Persisted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_lifecycle() {
        let mut phase = RecordPhase::Absent;
        for (event, expected) in [
            (PhaseEvent::BeginCreate, RecordPhase::PendingCreate),
            (PhaseEvent::Succeeded, RecordPhase::Persisted),
            (PhaseEvent::BeginUpdate, RecordPhase::PendingUpdate),
            (PhaseEvent::Failed, RecordPhase::Persisted),
            (PhaseEvent::BeginDelete, RecordPhase::PendingDelete),
            (PhaseEvent::Succeeded, RecordPhase::Absent),
        ] {
            phase = phase.apply(event).unwrap();
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(RecordPhase::Absent.apply(PhaseEvent::BeginDelete).is_err());
        assert!(RecordPhase::PendingDelete.apply(PhaseEvent::BeginUpdate).is_err());
        assert!(RecordPhase::Persisted.apply(PhaseEvent::BeginCreate).is_err());
        assert_eq!(
            RecordPhase::PendingCreate.apply(PhaseEvent::BeginCreate),
            Err(PhaseError {
                from: RecordPhase::PendingCreate,
                event: PhaseEvent::BeginCreate
            })
        );
    }

    #[test]
    fn test_tracker_sync() {
        let mut tracker = PhaseTracker::new();
        let ids = [RecordId::from(1), RecordId::from(2)];
        tracker.sync(ids.iter(), RecordKey::Medication);

        let one = RecordKey::Medication(RecordId::from(1));
        assert_eq!(tracker.phase(&one), RecordPhase::Persisted);

        tracker.apply(&one, PhaseEvent::BeginDelete).unwrap();
        tracker.sync([RecordId::from(2)].iter(), RecordKey::Medication);
        // Pending phases survive a reload that no longer lists the record
        assert_eq!(tracker.phase(&one), RecordPhase::PendingDelete);

        tracker.apply(&one, PhaseEvent::Succeeded).unwrap();
        assert_eq!(tracker.phase(&one), RecordPhase::Absent);
    }

    #[test]
    fn test_sync_leaves_other_kind_alone() {
        let mut tracker = PhaseTracker::new();
        tracker.sync([RecordId::from(1)].iter(), RecordKey::Doctor);
        tracker.sync(std::iter::empty(), RecordKey::Medication);
        assert_eq!(
            tracker.phase(&RecordKey::Doctor(RecordId::from(1))),
            RecordPhase::Persisted
        );
    }

    #[test]
    fn test_settle_create() {
        let mut tracker = PhaseTracker::new();
        tracker.apply(&RecordKey::NewDoctor, PhaseEvent::BeginCreate).unwrap();
        tracker.settle_create(&RecordKey::NewDoctor, Some(RecordKey::Doctor(RecordId::from(5))));

        assert_eq!(tracker.phase(&RecordKey::NewDoctor), RecordPhase::Absent);
        assert_eq!(
            tracker.phase(&RecordKey::Doctor(RecordId::from(5))),
            RecordPhase::Persisted
        );
        // Another create can start straight away
        assert!(tracker.apply(&RecordKey::NewDoctor, PhaseEvent::BeginCreate).is_ok());
    }

    #[test]
    fn test_illegal_apply_keeps_phase() {
        let mut tracker = PhaseTracker::new();
        let key = RecordKey::Doctor(RecordId::from(3));
        assert!(tracker.apply(&key, PhaseEvent::Succeeded).is_err());
        assert_eq!(tracker.phase(&key), RecordPhase::Absent);
    }
}
