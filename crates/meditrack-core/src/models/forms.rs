//! Form input and local validation.
//!
//! Validation runs before any network call. A form that fails validation
//! never reaches the gateway.

use std::sync::LazyLock;

use meditrack_api::{DoctorRequest, LoginRequest, MedicationRequest, RecordId, SignupRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s\-()]{10,}$").unwrap());

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Local validation failure. Displays as the message for the notification.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    fn single(field: &str, message: &str) -> Self {
        Self {
            message: message.to_string(),
            fields: vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }],
        }
    }
}

/// Collects field errors; the first summary message becomes the headline.
#[derive(Default)]
struct Collector {
    headline: Option<String>,
    fields: Vec<FieldError>,
}

impl Collector {
    fn reject(&mut self, field: &str, field_message: &str, summary: &str) {
        if self.headline.is_none() {
            self.headline = Some(summary.to_string());
        }
        self.fields.push(FieldError {
            field: field.to_string(),
            message: field_message.to_string(),
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        match self.headline {
            None => Ok(()),
            Some(message) => Err(ValidationError {
                message,
                fields: self.fields,
            }),
        }
    }
}

// =========================================================================
// Medication
// =========================================================================

/// Medication modal contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationForm {
    pub name: String,
    pub dosage: String,
    /// `HH:MM`
    pub time: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`, defaults to the start date
    pub end_date: String,
    /// `daily`, `weekly`, `monthly` or `once`
    pub frequency: String,
    pub notes: String,
    /// Doctor picked in the prescriber dropdown
    pub prescriber_id: Option<RecordId>,
}

pub const DEFAULT_FREQUENCY: &str = "daily";

impl MedicationForm {
    pub fn validate(&self) -> Result<MedicationRequest, ValidationError> {
        let name = self.name.trim();
        let dosage = self.dosage.trim();
        let time = self.time.trim();
        let start_date = self.start_date.trim();

        let mut collector = Collector::default();
        for (field, value) in [
            ("name", name),
            ("dosage", dosage),
            ("time", time),
            ("start_date", start_date),
        ] {
            if value.is_empty() {
                collector.reject(field, "Required", "Please fill in all required fields");
            }
        }
        collector.finish()?;

        let end_date = match self.end_date.trim() {
            "" => start_date,
            end => end,
        };
        let frequency = match self.frequency.trim() {
            "" => DEFAULT_FREQUENCY,
            f => f,
        };

        Ok(MedicationRequest {
            name: name.to_string(),
            dosage: dosage.to_string(),
            time: time.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            frequency: frequency.to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

// =========================================================================
// Doctor
// =========================================================================

/// Doctor modal contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorForm {
    pub name: String,
    pub specialty: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

impl DoctorForm {
    pub fn validate(&self) -> Result<DoctorRequest, ValidationError> {
        let name = self.name.trim();
        let specialty = self.specialty.trim();
        let phone = self.phone.trim();
        let email = self.email.trim();

        let mut collector = Collector::default();
        if name.is_empty() {
            collector.reject("name", "Doctor name is required", "Please enter doctor name");
        }
        if specialty.is_empty() {
            collector.reject(
                "specialty",
                "Specialty is required",
                "Please enter doctor specialty",
            );
        }
        if phone.is_empty() {
            collector.reject("phone", "Phone number is required", "Please enter phone number");
        } else if !is_valid_phone(phone) {
            collector.reject(
                "phone",
                "Please enter a valid phone number",
                "Please enter a valid phone number",
            );
        }
        if email.is_empty() {
            collector.reject("email", "Email is required", "Please enter email address");
        } else if !is_valid_email(email) {
            collector.reject(
                "email",
                "Please enter a valid email address",
                "Please enter a valid email address",
            );
        }
        collector.finish()?;

        Ok(DoctorRequest {
            name: name.to_string(),
            specialty: specialty.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

// =========================================================================
// Auth
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = self.email.trim();
        let password = self.password.trim();
        if email.is_empty() || password.is_empty() {
            let field = if email.is_empty() { "email" } else { "password" };
            return Err(ValidationError::single(field, "Please fill in all fields."));
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub contact: Option<String>,
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let password = self.password.trim();
        let confirm = self.confirm_password.trim();

        let mut collector = Collector::default();
        for (field, value) in [
            ("name", name),
            ("email", email),
            ("password", password),
            ("confirm_password", confirm),
        ] {
            if value.is_empty() {
                collector.reject(field, "Required", "Please fill in all required fields.");
            }
        }
        collector.finish()?;

        if password != confirm {
            return Err(ValidationError::single(
                "confirm_password",
                "Passwords do not match!",
            ));
        }

        Ok(SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            age: optional(&self.age),
            gender: optional(&self.gender),
            contact: optional(&self.contact),
            role: "client".to_string(),
        })
    }
}
