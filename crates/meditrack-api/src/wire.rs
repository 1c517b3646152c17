//! JSON shapes exchanged with the MediTrack service.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Wire decoding errors.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type WireResult<T> = Result<T, WireError>;

/// `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a list entry by entry. Entries that do not fit `T` are dropped
/// and reported; the rest of the list survives.
fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let items = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping malformed list entry");
                None
            }
        })
        .collect();
    Ok(items)
}

/// Server-assigned record identifier.
///
/// The service emits integer ids, but the client treats them as opaque text:
/// they are only ever compared, hashed and formatted into URL paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

// =========================================================================
// Auth
// =========================================================================

/// User fields returned by login and check-auth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWire {
    pub user_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserWire,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserWire>,
}

// =========================================================================
// Medications
// =========================================================================

/// A medication as any of the medication endpoints return it.
///
/// The schedule endpoints fill `time`/`status`; the my-medications endpoints
/// fill the detail fields instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationWire {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dosage: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reminder_id: Option<RecordId>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub prescriber: Option<String>,
    #[serde(default, rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub refills: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationsEnvelope {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub medications: Vec<MedicationWire>,
}

/// One calendar entry of the monthly view. `time` is a period name
/// (`morning`, `afternoon`, `evening`, `night`), not a clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dosage: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Monthly calendar keyed by day of month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyEnvelope {
    #[serde(default)]
    pub medications: BTreeMap<String, Vec<MonthlyEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationRequest {
    pub name: String,
    pub dosage: String,
    pub time: String,
    pub start_date: String,
    pub end_date: String,
    pub frequency: String,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicationCreated {
    #[serde(default)]
    pub medicine_id: Option<RecordId>,
    #[serde(default)]
    pub reminders_created: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// =========================================================================
// Doctors
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorWire {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorsEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub doctors: Vec<DoctorWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorRequest {
    pub name: String,
    pub specialty: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorSaved {
    #[serde(default)]
    pub doctor_id: Option<RecordId>,
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================================
// Generic bodies
// =========================================================================

/// Acknowledgement body for updates, deletes and logout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Parse a JSON response body.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> WireResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Extract the `error` field of a failure body, if the body is JSON and has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
}
