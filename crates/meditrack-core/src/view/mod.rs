//! View rendering.
//!
//! Every render builds a complete tree for one container from the current
//! lists and swaps it in whole through [`Screen::mount`]. There is no
//! diffing: a container's previous nodes and handler bindings are discarded
//! on each render.

mod dashboard;
mod doctors;
mod medications;
mod node;
mod screen;

pub use dashboard::*;
pub use doctors::*;
pub use medications::*;
pub use node::*;
pub use screen::*;

use serde::{Deserialize, Serialize};

use crate::models::{MedicationStatus, RecordId};

// =========================================================================
// Container ids
// =========================================================================

pub const MEDICINE_LIST: &str = "medicineList";
pub const EMPTY_STATE: &str = "emptyState";
pub const TODAY_MEDICATIONS: &str = "today-medications";
pub const MEDICATIONS_GRID: &str = "medicationsGrid";
pub const DOCTORS_GRID: &str = "doctorsGrid";
pub const PRESCRIBER_SELECT: &str = "medicinePrescriber";

pub const ACTIVE_MEDS_COUNT: &str = "active-meds-count";
pub const UPCOMING_DOSES_COUNT: &str = "upcoming-doses-count";
pub const NEXT_DOSE_TIME: &str = "next-dose-time";
pub const ADHERENCE_RATE: &str = "adherence-rate";
pub const WELCOME_MESSAGE: &str = "welcome-message";
pub const USERNAME: &str = "username";
pub const AVATAR: &str = "avatar-placeholder";
pub const CURRENT_DATE: &str = "current-date-display";

pub const DOCTORS_COUNT: &str = "doctorsCount";
pub const TOTAL_DOCTORS: &str = "totalDoctors";
pub const SPECIALTIES_COUNT: &str = "specialtiesCount";
pub const ACTIVITY_LIST: &str = "activityList";

/// What a click on a rendered control asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MarkTaken(RecordId),
    EditMedication(RecordId),
    DeleteMedication(RecordId),
    EditDoctor(RecordId),
    DeleteDoctor(RecordId),
    OpenMedicationModal,
    OpenDoctorModal,
}

/// Label, icon and CSS class for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub icon: &'static str,
    pub class: &'static str,
}

pub fn status_display(status: MedicationStatus) -> StatusDisplay {
    match status {
        MedicationStatus::Completed => StatusDisplay {
            label: "Taken",
            icon: "fas fa-check-circle",
            class: "status-taken",
        },
        MedicationStatus::Pending => StatusDisplay {
            label: "Upcoming",
            icon: "far fa-clock",
            class: "status-upcoming",
        },
        MedicationStatus::Missed => StatusDisplay {
            label: "Missed",
            icon: "fas fa-exclamation-circle",
            class: "status-missed",
        },
    }
}
