//! Medication models.

use meditrack_api::{MedicationWire, RecordId};
use serde::{Deserialize, Serialize};

/// Dose status as the client understands it.
///
/// The service is inconsistent about casing (`Pending` from one endpoint,
/// `pending` from another) and vocabulary (`taken` vs `Completed`), so every
/// spelling collapses into one of three variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedicationStatus {
    /// Pending or upcoming
    Pending,
    /// Completed or taken
    Completed,
    /// Missed, or any status the client does not recognise
    Missed,
}

impl MedicationStatus {
    /// Parse a server status string. An absent status is pending, which is
    /// what the service assumes for reminders it has not touched.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return MedicationStatus::Pending;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "upcoming" => MedicationStatus::Pending,
            "completed" | "taken" => MedicationStatus::Completed,
            _ => MedicationStatus::Missed,
        }
    }

    /// Value sent in a status update body.
    pub fn wire_value(&self) -> &'static str {
        match self {
            MedicationStatus::Pending => "pending",
            MedicationStatus::Completed => "taken",
            MedicationStatus::Missed => "missed",
        }
    }
}

/// Fields only the my-medications endpoints return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationDetail {
    pub frequency: Option<String>,
    pub purpose: Option<String>,
    pub start_date: Option<String>,
    pub refills: Option<u32>,
    /// Server-side prescriber name (not the local prescriber link)
    pub prescriber: Option<String>,
}

/// A medication as cached for one page view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Server-assigned ID
    pub id: RecordId,
    /// Display name
    pub name: String,
    /// Dosage string (e.g. "100mg")
    pub dosage: String,
    /// Raw scheduled time: bare `HH:MM[:SS]` or a full timestamp
    pub time: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Dose status
    pub status: MedicationStatus,
    /// Extended fields, present only on the detail endpoints
    pub detail: Option<MedicationDetail>,
}

impl MedicationRecord {
    /// Create a record with only the required fields.
    pub fn new(id: impl Into<RecordId>, name: &str, dosage: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            dosage: dosage.to_string(),
            time: None,
            notes: None,
            status: MedicationStatus::Pending,
            detail: None,
        }
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = Some(time.to_string());
        self
    }

    pub fn with_status(mut self, status: MedicationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == MedicationStatus::Pending
    }

    pub fn is_taken(&self) -> bool {
        self.status == MedicationStatus::Completed
    }

    /// Time string used for lexicographic ordering.
    pub fn sort_key(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }
}

impl From<MedicationWire> for MedicationRecord {
    fn from(wire: MedicationWire) -> Self {
        let has_detail = wire.frequency.is_some()
            || wire.purpose.is_some()
            || wire.start_date.is_some()
            || wire.refills.is_some();

        let detail = has_detail.then(|| MedicationDetail {
            frequency: wire.frequency,
            purpose: wire.purpose,
            start_date: wire.start_date,
            refills: wire.refills,
            prescriber: wire.prescriber,
        });

        Self {
            status: MedicationStatus::parse(wire.status.as_deref()),
            id: wire.id,
            name: wire.name,
            dosage: wire.dosage,
            time: wire.time.filter(|t| !t.is_empty()),
            notes: wire.notes.filter(|n| !n.trim().is_empty()),
            detail,
        }
    }
}
