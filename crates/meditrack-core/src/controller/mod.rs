//! Mutation controller.
//!
//! One [`PageController`] per page view owns every piece of page state: the
//! reconciled lists, the edit target, the open modal, the mounted screen and
//! the notification queue. Mutations follow one protocol:
//!
//! 1. validate locally; a rejected form never reaches the network
//! 2. call the gateway
//! 3. on success reload the affected list from the server and re-render
//! 4. on failure notify and leave the rendered list as it was
//!
//! There is no optimistic patching. Calls are blocking and sequential.

mod doctors;
mod medications;
mod modal;
mod notify;
mod phase;
mod session;

pub use modal::*;
pub use notify::*;
pub use phase::*;

use meditrack_api::{MonthlyEntry, Transport};

use crate::db::Database;
use crate::gateway::{ApiError, ApiGateway};
use crate::models::{DoctorRecord, Identity, MedicationRecord, ValidationError};
use crate::page::Page;
use crate::reconcile::RecordList;
use crate::schedule::{Clock, DashboardStats};
use crate::view::{
    paint_dashboard_stats, paint_doctor_stats, paint_user_header, render_doctors,
    render_medicine_list, render_my_medications, render_prescriber_options, render_today,
    Action, HandlerId, Screen, DOCTORS_GRID, MEDICATIONS_GRID, MEDICINE_LIST, PRESCRIBER_SELECT,
    TODAY_MEDICATIONS,
};

/// Result of a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Server accepted the change and the list was reloaded
    Applied,
    /// Local validation failed; nothing was sent
    Rejected(ValidationError),
    /// The server or network refused
    Failed(ApiError),
    /// The user declined the confirmation prompt
    Cancelled,
    /// Unknown record, stale handler, or a record already mid-mutation
    Ignored,
    /// A modal was opened and pre-filled
    ModalOpened,
    /// The host should load another page
    Navigate(String),
}

/// Confirmation prompt for destructive actions. Returns whether the user
/// agreed.
pub type Confirm<'a> = &'a dyn Fn(&str) -> bool;

/// State and actions of one page view.
pub struct PageController {
    page: Page,
    db: Database,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    medications: RecordList<MedicationRecord>,
    today: RecordList<MedicationRecord>,
    doctors: RecordList<DoctorRecord>,
    search_term: String,
    editing: Option<EditTarget>,
    modal: Modal,
    screen: Screen,
    notifier: Notifier,
    phases: PhaseTracker,
}

impl PageController {
    pub fn new(
        page: Page,
        db: Database,
        transport: Box<dyn Transport>,
        clock: Box<dyn Clock>,
        notification_ttl_secs: u64,
    ) -> Self {
        Self {
            page,
            db,
            transport,
            clock,
            medications: RecordList::new(),
            today: RecordList::new(),
            doctors: RecordList::new(),
            search_term: String::new(),
            editing: None,
            modal: Modal::Closed,
            screen: Screen::new(),
            notifier: Notifier::new(notification_ttl_secs),
            phases: PhaseTracker::new(),
        }
    }

    fn gateway(&self) -> ApiGateway<'_> {
        ApiGateway::new(self.transport.as_ref(), &self.db)
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn medications(&self) -> &[MedicationRecord] {
        self.medications.items()
    }

    /// Today's records, loaded by the dashboard.
    pub fn today(&self) -> &[MedicationRecord] {
        self.today.items()
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        self.doctors.items()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn editing(&self) -> Option<&EditTarget> {
        self.editing.as_ref()
    }

    pub fn phase(&self, key: &RecordKey) -> RecordPhase {
        self.phases.phase(key)
    }

    /// Unexpired notifications.
    pub fn notifications(&mut self) -> Vec<Notification> {
        let now = self.clock.now();
        self.notifier.active(now)
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifier.latest()
    }

    pub fn dismiss_notification(&mut self, id: &str) -> bool {
        self.notifier.dismiss(id)
    }

    /// Stored identity. Unreadable storage reads as signed out.
    pub fn identity(&self) -> Option<Identity> {
        self.db.load_identity().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "identity unreadable");
            None
        })
    }

    fn notify_success(&mut self, message: &str) {
        let now = self.clock.now();
        self.notifier.success(message, now);
    }

    fn notify_error(&mut self, message: &str) {
        let now = self.clock.now();
        self.notifier.error(message, now);
    }

    // =====================================================================
    // Loads
    // =====================================================================

    fn sync_medication_phases(&mut self) {
        let ids = self
            .medications
            .items()
            .iter()
            .chain(self.today.items())
            .map(|m| &m.id);
        self.phases.sync(ids, RecordKey::Medication);
    }

    /// Fetch, reconcile and render the schedule list. The today's-schedule
    /// page lists today's doses, every other page all medications.
    pub fn load_medications(&mut self) {
        let result = if self.page == Page::MedicineSchedule {
            self.gateway().today_medications()
        } else {
            self.gateway().list_medications()
        };

        match result {
            Ok(raw) => {
                let dropped = self.medications.replace(raw);
                tracing::info!(count = self.medications.len(), dropped, "medications loaded");
            }
            Err(e) => {
                let message = format!("Failed to load medications: {}", e.user_message("Unknown error"));
                self.notify_error(&message);
                self.medications.replace(Vec::new());
            }
        }
        self.sync_medication_phases();

        let view = render_medicine_list(self.medications.items());
        self.screen.mount(MEDICINE_LIST, view);
    }

    /// My-medications grid. A non-blank term goes through the search endpoint.
    pub fn load_my_medications(&mut self, search_term: &str) {
        self.search_term = search_term.trim().to_string();
        let result = if self.search_term.is_empty() {
            self.gateway().my_medications()
        } else {
            self.gateway().search_my_medications(&self.search_term)
        };

        match result {
            Ok(raw) => {
                let dropped = self.medications.replace(raw);
                tracing::info!(count = self.medications.len(), dropped, "my medications loaded");
            }
            Err(e) => {
                let message = format!("Failed to load medications: {}", e.user_message("Unknown error"));
                self.notify_error(&message);
                self.medications.replace(Vec::new());
            }
        }
        self.sync_medication_phases();

        let db = &self.db;
        let view = render_my_medications(self.medications.items(), |id| {
            db.get_prescriber(id).unwrap_or_else(|e| {
                tracing::warn!(medication_id = %id, error = %e, "prescriber unreadable");
                None
            })
        });
        self.screen.mount(MEDICATIONS_GRID, view);
    }

    /// Today's doses grouped by time of day.
    pub fn load_today(&mut self) {
        match self.gateway().today_medications() {
            Ok(raw) => {
                self.today.replace(raw);
            }
            Err(e) => {
                // The grouped view keeps what it had
                tracing::warn!(error = %e, "today's medications unavailable");
                return;
            }
        }
        self.sync_medication_phases();

        let view = render_today(self.today.items());
        self.screen.mount(TODAY_MEDICATIONS, view);
    }

    /// Dashboard: user header, stat fields and the grouped list.
    pub fn load_dashboard(&mut self) {
        let identity = self.identity();
        paint_user_header(&mut self.screen, identity.as_ref());

        let all = self.gateway().list_medications().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "medications unavailable for stats");
            Vec::new()
        });
        self.medications.replace(all);
        self.load_today();

        let now = self.clock.now();
        let stats = DashboardStats::compute(self.medications.items(), self.today.items(), now);
        tracing::debug!(?stats, "dashboard stats");
        paint_dashboard_stats(&mut self.screen, &stats, self.clock.today());
    }

    /// Doctors grid and stats on the doctors page, the prescriber dropdown
    /// elsewhere. A failed fetch renders an empty list.
    pub fn load_doctors(&mut self) {
        match self.gateway().list_doctors() {
            Ok(raw) => {
                let dropped = self.doctors.replace(raw);
                tracing::info!(count = self.doctors.len(), dropped, "doctors loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load doctors");
                self.doctors.replace(Vec::new());
            }
        }
        let ids = self.doctors.items().iter().map(|d| &d.id);
        self.phases.sync(ids, RecordKey::Doctor);

        if self.page == Page::Doctors {
            let view = render_doctors(self.doctors.items());
            self.screen.mount(DOCTORS_GRID, view);
            paint_doctor_stats(&mut self.screen, self.doctors.items());
        } else {
            let view = render_prescriber_options(self.doctors.items());
            self.screen.mount(PRESCRIBER_SELECT, view);
        }
    }

    /// Calendar entries of one month, ordered by day. A failed fetch
    /// notifies and yields nothing.
    pub fn monthly_calendar(&mut self, year: i32, month: u32) -> Vec<(u32, MonthlyEntry)> {
        let envelope = match self.gateway().monthly_medications(year, month) {
            Ok(envelope) => envelope,
            Err(e) => {
                let message = format!("Failed to load medications: {}", e.user_message("Unknown error"));
                self.notify_error(&message);
                return Vec::new();
            }
        };

        let mut days: Vec<(u32, MonthlyEntry)> = envelope
            .medications
            .into_iter()
            .filter_map(|(day, entries)| match day.parse::<u32>() {
                Ok(day) => Some(entries.into_iter().map(move |entry| (day, entry))),
                Err(_) => {
                    tracing::warn!(%day, "calendar day is not a number");
                    None
                }
            })
            .flatten()
            .collect();
        days.sort_by_key(|(day, _)| *day);
        days
    }

    /// Reload whatever medication view the page shows.
    pub fn reload(&mut self) {
        match self.page {
            Page::Dashboard => self.load_dashboard(),
            Page::MyMedications => {
                let term = self.search_term.clone();
                self.load_my_medications(&term);
            }
            Page::Doctors => self.load_doctors(),
            page if page.shows_schedule() => self.load_medications(),
            _ => {}
        }
    }

    // =====================================================================
    // Modal
    // =====================================================================

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
        self.editing = None;
    }

    // =====================================================================
    // Dispatch
    // =====================================================================

    /// Route a click on a rendered control. Handlers from a replaced tree
    /// are ignored.
    pub fn dispatch(&mut self, handler: HandlerId, confirm: Confirm<'_>) -> Outcome {
        let Some(action) = self.screen.resolve(handler) else {
            tracing::debug!(handler, "stale or unknown handler");
            return Outcome::Ignored;
        };
        tracing::debug!(handler, ?action, "dispatch");

        match action {
            Action::MarkTaken(id) => self.mark_taken(&id),
            Action::EditMedication(id) if self.page == Page::MyMedications => {
                Outcome::Navigate(crate::page::edit_medication_url(&id))
            }
            Action::EditMedication(id) => self.open_edit_medication(&id),
            Action::DeleteMedication(id) => self.delete_medication(&id, confirm),
            Action::EditDoctor(id) => self.open_edit_doctor(&id),
            Action::DeleteDoctor(id) => self.delete_doctor(&id, confirm),
            Action::OpenMedicationModal => self.open_create_medication(),
            Action::OpenDoctorModal => self.open_create_doctor(),
        }
    }
}
