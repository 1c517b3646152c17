//! Modal state and form pre-fill.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::{
    DoctorForm, DoctorRecord, MedicationForm, MedicationRecord, PrescriberLink, RecordId,
    DEFAULT_FREQUENCY,
};
use crate::schedule::{input_time, parse_scheduled, ScheduledTime};

/// Frequency shown when editing a record that carries none.
const EDIT_FREQUENCY: &str = "once";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The record an open modal is editing. At most one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EditTarget {
    Medication(RecordId),
    Doctor(RecordId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationModal {
    pub title: String,
    pub submit_label: String,
    pub form: MedicationForm,
}

impl MedicationModal {
    /// Blank form: today through a week from today, at the next hour, daily.
    pub fn create(now: NaiveDateTime) -> Self {
        let today = now.date();
        Self {
            title: "Add New Medicine".into(),
            submit_label: "Add Medicine".into(),
            form: MedicationForm {
                time: (now + Duration::hours(1)).format("%H:%M").to_string(),
                start_date: today.format(DATE_FORMAT).to_string(),
                end_date: (today + Duration::days(7)).format(DATE_FORMAT).to_string(),
                frequency: DEFAULT_FREQUENCY.into(),
                ..Default::default()
            },
        }
    }

    /// Form pre-filled from a cached record.
    pub fn edit(record: &MedicationRecord, prescriber: Option<&PrescriberLink>, now: NaiveDateTime) -> Self {
        let detail = record.detail.clone().unwrap_or_default();
        let scheduled = record.time.as_deref().and_then(parse_scheduled);
        let start_date = detail
            .start_date
            .clone()
            .or_else(|| match scheduled {
                Some(ScheduledTime::At(at)) => Some(at.date().format(DATE_FORMAT).to_string()),
                _ => None,
            })
            .unwrap_or_else(|| now.date().format(DATE_FORMAT).to_string());

        Self {
            title: "Edit Medicine".into(),
            submit_label: "Update Medicine".into(),
            form: MedicationForm {
                name: record.name.clone(),
                dosage: record.dosage.clone(),
                time: record.time.as_deref().and_then(input_time).unwrap_or_default(),
                start_date,
                end_date: String::new(),
                frequency: detail.frequency.unwrap_or_else(|| EDIT_FREQUENCY.into()),
                notes: record.notes.clone().unwrap_or_default(),
                prescriber_id: prescriber.and_then(|p| p.doctor_id.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorModal {
    pub title: String,
    pub submit_label: String,
    pub form: DoctorForm,
}

impl DoctorModal {
    pub fn create() -> Self {
        Self {
            title: "Add New Doctor".into(),
            submit_label: "Add Doctor".into(),
            form: DoctorForm::default(),
        }
    }

    pub fn edit(doctor: &DoctorRecord) -> Self {
        Self {
            title: "Edit Doctor".into(),
            submit_label: "Update Doctor".into(),
            form: DoctorForm {
                name: doctor.name.clone(),
                specialty: doctor.specialty.clone().unwrap_or_default(),
                phone: doctor.phone.clone().unwrap_or_default(),
                email: doctor.email.clone().unwrap_or_default(),
                address: doctor.address.clone().unwrap_or_default(),
            },
        }
    }
}

/// Which modal is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum Modal {
    #[default]
    Closed,
    Medication(MedicationModal),
    Doctor(DoctorModal),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}
