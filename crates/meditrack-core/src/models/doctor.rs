//! Doctor models.

use meditrack_api::{DoctorWire, RecordId};
use serde::{Deserialize, Serialize};

/// Specialty shown when a doctor has none on record.
pub const DEFAULT_SPECIALTY: &str = "General Practitioner";

/// A prescribing doctor as cached for one page view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: RecordId,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl DoctorRecord {
    pub fn new(id: impl Into<RecordId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            specialty: None,
            phone: None,
            email: None,
            address: None,
        }
    }

    pub fn with_specialty(mut self, specialty: &str) -> Self {
        self.specialty = Some(specialty.to_string());
        self
    }

    /// Specialty for display, falling back to [`DEFAULT_SPECIALTY`].
    pub fn specialty_label(&self) -> &str {
        self.specialty.as_deref().unwrap_or(DEFAULT_SPECIALTY)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<DoctorWire> for DoctorRecord {
    fn from(wire: DoctorWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            specialty: non_empty(wire.specialty),
            phone: non_empty(wire.phone),
            email: non_empty(wire.email),
            address: non_empty(wire.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialty_default() {
        let doctor = DoctorRecord::new(1, "Dr. Adams");
        assert_eq!(doctor.specialty_label(), "General Practitioner");

        let doctor = doctor.with_specialty("Cardiology");
        assert_eq!(doctor.specialty_label(), "Cardiology");
    }

    #[test]
    fn test_from_wire_drops_blank_fields() {
        let wire: DoctorWire = serde_json::from_str(
            r#"{"id": 2, "name": "Dr. Brown", "specialty": "", "phone": "555-0100-222"}"#,
        )
        .unwrap();

        let doctor = DoctorRecord::from(wire);
        assert!(doctor.specialty.is_none());
        assert_eq!(doctor.phone.as_deref(), Some("555-0100-222"));
        assert!(doctor.email.is_none());
    }
}
