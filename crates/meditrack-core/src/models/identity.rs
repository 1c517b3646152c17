//! Locally persisted identity and prescriber snapshots.

use meditrack_api::{RecordId, UserWire};
use serde::{Deserialize, Serialize};

use super::doctor::{DoctorRecord, DEFAULT_SPECIALTY};

/// The signed-in user, stored under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Identity {
    /// Name for greetings, "User" when the server sent none.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "User"
        } else {
            &self.name
        }
    }

    /// Uppercased first letter of each word of the display name.
    pub fn initials(&self) -> String {
        initials(self.display_name())
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

impl From<UserWire> for Identity {
    fn from(user: UserWire) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

pub(crate) fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Local-only snapshot of the doctor who prescribed a medication.
///
/// Stored under `meditrack-prescriber-<medicationId>`. This copy can drift
/// from the server's doctor record and is only ever displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriberLink {
    /// Source doctor, when the snapshot was taken from a known record.
    /// Older snapshots stored the whole doctor, so `id` is read too.
    #[serde(default, alias = "id")]
    pub doctor_id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

impl PrescriberLink {
    /// "Name (Specialty)".
    pub fn label(&self) -> String {
        format!(
            "{} ({})",
            self.name,
            self.specialty.as_deref().unwrap_or(DEFAULT_SPECIALTY)
        )
    }
}

impl From<&DoctorRecord> for PrescriberLink {
    fn from(doctor: &DoctorRecord) -> Self {
        Self {
            doctor_id: Some(doctor.id.clone()),
            name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let identity = Identity {
            user_id: RecordId::from(1),
            name: "jane van doe".into(),
            email: None,
            role: Some("client".into()),
        };
        assert_eq!(identity.initials(), "JVD");
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_blank_name_displays_user() {
        let identity = Identity {
            user_id: RecordId::from(1),
            name: "  ".into(),
            email: None,
            role: None,
        };
        assert_eq!(identity.display_name(), "User");
        assert_eq!(identity.initials(), "U");
    }

    #[test]
    fn test_legacy_identity_blob_with_int_id() {
        let identity: Identity =
            serde_json::from_str(r#"{"user_id": 12, "name": "Sam", "role": "client"}"#).unwrap();
        assert_eq!(identity.user_id.as_str(), "12");
    }

    #[test]
    fn test_prescriber_label() {
        let doctor = DoctorRecord::new(5, "Dr. Chen");
        let link = PrescriberLink::from(&doctor);
        assert_eq!(link.label(), "Dr. Chen (General Practitioner)");
        assert_eq!(link.doctor_id, Some(RecordId::from(5)));
    }
}
