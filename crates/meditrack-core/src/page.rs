//! Page detection and boot wiring.

use serde::{Deserialize, Serialize};

use crate::controller::{Outcome, PageController};
use crate::models::RecordId;
use crate::view::paint_user_header;

pub const LOGIN_PAGE: &str = "login.html";
pub const SIGNUP_PAGE: &str = "signup.html";
pub const DASHBOARD_PAGE: &str = "dashboard.html";
pub const ADMIN_DASHBOARD_PAGE: &str = "admin-dashboard.html";
pub const SCHEDULE_PAGE: &str = "medicine_schedule.html";
pub const SCHEDULE_OVERALL_PAGE: &str = "medicine_schedule_overall.html";
pub const MY_MEDICATIONS_PAGE: &str = "my_medications.html";
pub const DOCTORS_PAGE: &str = "doctors.html";

/// The page a controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Login,
    Signup,
    /// User dashboard
    Dashboard,
    /// Today's schedule
    MedicineSchedule,
    /// Every scheduled medication
    MedicineScheduleOverall,
    MyMedications,
    Doctors,
    Other,
}

impl Page {
    /// Detect the page from a location path. Query string and fragment are
    /// ignored.
    pub fn detect(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();

        match file {
            LOGIN_PAGE => Page::Login,
            SIGNUP_PAGE => Page::Signup,
            SCHEDULE_PAGE => Page::MedicineSchedule,
            SCHEDULE_OVERALL_PAGE => Page::MedicineScheduleOverall,
            MY_MEDICATIONS_PAGE => Page::MyMedications,
            DOCTORS_PAGE => Page::Doctors,
            // also "user dashboard.html" and its escaped form
            f if f.ends_with(DASHBOARD_PAGE) && !f.starts_with("admin") => Page::Dashboard,
            _ => Page::Other,
        }
    }

    /// Whether the page renders a medication list of its own.
    pub fn shows_schedule(&self) -> bool {
        matches!(self, Page::MedicineSchedule | Page::MedicineScheduleOverall | Page::Other)
    }
}

/// What the query string asks the schedule page to do on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageIntent {
    None,
    AddMedication,
    EditMedication(RecordId),
}

impl PageIntent {
    /// Parse `action=add` or `action=edit&id=N`. A leading `?` is allowed.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut action = None;
        let mut id = None;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "action" => action = Some(value),
                "id" if !value.is_empty() => id = Some(value),
                _ => {}
            }
        }

        match (action, id) {
            (Some("add"), _) => PageIntent::AddMedication,
            (Some("edit"), Some(id)) => PageIntent::EditMedication(RecordId::new(id)),
            _ => PageIntent::None,
        }
    }
}

/// Location of the schedule page editing one medication.
pub fn edit_medication_url(id: &RecordId) -> String {
    format!("{}?action=edit&id={}", SCHEDULE_PAGE, id)
}

/// Location of the schedule page with the add modal open.
pub fn add_medication_url() -> String {
    format!("{}?action=add", SCHEDULE_PAGE)
}

/// Run the initial loads for the controller's page, then honour the
/// query string intent. Returns the intent's outcome when there was one.
pub fn boot(controller: &mut PageController, query: &str) -> Option<Outcome> {
    let page = controller.page();
    tracing::info!(?page, "booting page");

    match page {
        Page::Login | Page::Signup => {}
        Page::Dashboard => controller.load_dashboard(),
        Page::MedicineSchedule | Page::MedicineScheduleOverall | Page::Other => {
            controller.load_doctors();
            controller.load_medications();
        }
        Page::MyMedications => {
            let identity = controller.identity();
            paint_user_header(controller.screen_mut(), identity.as_ref());
            controller.load_doctors();
            controller.load_my_medications("");
        }
        Page::Doctors => {
            let identity = controller.identity();
            paint_user_header(controller.screen_mut(), identity.as_ref());
            controller.load_doctors();
        }
    }

    if page != Page::MedicineSchedule {
        return None;
    }
    match PageIntent::parse(query) {
        PageIntent::None => None,
        PageIntent::AddMedication => Some(controller.open_create_medication()),
        PageIntent::EditMedication(id) => Some(controller.open_edit_medication(&id)),
    }
}
