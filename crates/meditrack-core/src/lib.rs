//! MediTrack Client Core
//!
//! Page-level client logic for a medication tracking service: it fetches
//! medication and doctor records, reconciles them, renders view trees for a
//! host shell and drives every mutation through a validate, call, reload
//! cycle.
//!
//! # Architecture
//!
//! ```text
//!   host shell (web view, native UI)
//!          │  clicks (handler ids), forms, confirm prompts
//!          ▼
//!   ┌──────────────────┐      ┌──────────────┐      ┌──────────────┐
//!   │  PageController  │─────▶│  ApiGateway  │─────▶│  Transport   │──▶ service
//!   │  phases, modal,  │      │  credentials │      │  HTTP / mock │
//!   │  notifications   │      └──────┬───────┘      └──────────────┘
//!   └────────┬─────────┘             │
//!            │ reload                ▼
//!            ▼                ┌──────────────┐
//!   reconcile → schedule      │   Database   │  identity, prescriber links
//!            │                └──────────────┘
//!            ▼
//!   view::render_* → Screen (whole-container swap, fresh handler ids)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite-backed local key/value storage
//! - [`models`]: Domain records and form validation
//! - [`gateway`]: Authenticated calls to the remote service
//! - [`reconcile`]: Duplicate-free, ordered record lists
//! - [`schedule`]: Time-of-day buckets and dashboard statistics
//! - [`view`]: View trees and the mounted screen
//! - [`controller`]: Page state and mutations
//! - [`page`]: Page detection and boot wiring

pub mod config;
pub mod controller;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod page;
pub mod reconcile;
pub mod schedule;
pub mod view;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigError};
pub use controller::{Confirm, Modal, Notification, NotificationKind, Outcome, PageController};
pub use db::Database;
pub use gateway::{ApiError, ApiGateway};
pub use logging::init_logging;
pub use models::{
    DoctorForm, DoctorRecord, Identity, LoginForm, MedicationForm, MedicationRecord,
    MedicationStatus, PrescriberLink, RecordId, SignupForm, ValidationError,
};
pub use page::{boot, Page};
pub use schedule::{Clock, DashboardStats, SystemClock};
pub use view::{Action, Screen, ViewNode};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use meditrack_api::{HttpTransport, Transport, TransportError};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MediTrackError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for MediTrackError {
    fn from(e: db::DbError) -> Self {
        MediTrackError::StorageError(e.to_string())
    }
}

impl From<TransportError> for MediTrackError {
    fn from(e: TransportError) -> Self {
        MediTrackError::TransportError(e.to_string())
    }
}

impl From<ConfigError> for MediTrackError {
    fn from(e: ConfigError) -> Self {
        MediTrackError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for MediTrackError {
    fn from(e: serde_json::Error) -> Self {
        MediTrackError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MediTrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MediTrackError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

fn build_client(
    page_path: &str,
    config: &ClientConfig,
    transport: Box<dyn Transport>,
) -> Result<Arc<MediTrackClient>, MediTrackError> {
    let db = match &config.storage_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    let page = Page::detect(page_path);
    tracing::info!(?page, api = %config.api_base_url, "client opened");

    let controller = PageController::new(
        page,
        db,
        transport,
        Box::new(SystemClock),
        config.notification_ttl_secs,
    );
    Ok(Arc::new(MediTrackClient {
        controller: Mutex::new(controller),
    }))
}

/// Open a client for the page at `page_path`, configured from the
/// environment.
#[uniffi::export]
pub fn open_client(page_path: String) -> Result<Arc<MediTrackClient>, MediTrackError> {
    let config = ClientConfig::from_env()?;
    let transport = HttpTransport::new(&config.api_base_url)?;
    build_client(&page_path, &config, Box::new(transport))
}

/// Open a client against `api_base_url` with storage kept in memory.
#[uniffi::export]
pub fn open_client_in_memory(
    page_path: String,
    api_base_url: String,
) -> Result<Arc<MediTrackClient>, MediTrackError> {
    let config = ClientConfig {
        api_base_url,
        ..ClientConfig::default()
    };
    let transport = HttpTransport::new(&config.api_base_url)?;
    build_client(&page_path, &config, Box::new(transport))
}

/// Install the tracing subscriber. Safe to call more than once.
#[uniffi::export]
pub fn setup_logging() -> bool {
    init_logging()
}

// =========================================================================
// Callback Interfaces
// =========================================================================

/// Blocking yes/no prompt shown before destructive actions.
#[uniffi::export(callback_interface)]
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: String) -> bool;
}

fn prompt_fn(prompt: &dyn ConfirmPrompt) -> impl Fn(&str) -> bool + '_ {
    move |message: &str| prompt.confirm(message.to_string())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe page controller wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MediTrackClient {
    controller: Mutex<PageController>,
}

impl MediTrackClient {
    /// Wrap an already built controller.
    pub fn from_controller(controller: PageController) -> Arc<Self> {
        Arc::new(Self {
            controller: Mutex::new(controller),
        })
    }
}

#[uniffi::export]
impl MediTrackClient {
    // =========================================================================
    // Page Lifecycle
    // =========================================================================

    /// Run the page's initial loads and honour `?action=` intents.
    pub fn boot(&self, query: String) -> Result<Option<FfiOutcome>, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(boot(&mut controller, &query).map(FfiOutcome::from))
    }

    /// Reload whatever the page shows.
    pub fn reload(&self) -> Result<(), MediTrackError> {
        self.controller.lock()?.reload();
        Ok(())
    }

    /// Route a click on a rendered control.
    pub fn dispatch(
        &self,
        handler: u64,
        prompt: Box<dyn ConfirmPrompt>,
    ) -> Result<FfiOutcome, MediTrackError> {
        let mut controller = self.controller.lock()?;
        let confirm = prompt_fn(prompt.as_ref());
        Ok(controller.dispatch(handler, &confirm).into())
    }

    /// Re-query the my-medications grid.
    pub fn search_my_medications(&self, term: String) -> Result<(), MediTrackError> {
        self.controller.lock()?.load_my_medications(&term);
        Ok(())
    }

    /// Monthly calendar entries, ordered by day.
    pub fn monthly_calendar(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<FfiCalendarEntry>, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(controller
            .monthly_calendar(year, month)
            .into_iter()
            .map(|(day, entry)| FfiCalendarEntry {
                day,
                name: entry.name,
                period: entry.time,
                dosage: entry.dosage,
                icon: entry.icon,
            })
            .collect())
    }

    // =========================================================================
    // Forms and Modals
    // =========================================================================

    pub fn open_create_medication(&self) -> Result<FfiOutcome, MediTrackError> {
        Ok(self.controller.lock()?.open_create_medication().into())
    }

    pub fn open_create_doctor(&self) -> Result<FfiOutcome, MediTrackError> {
        Ok(self.controller.lock()?.open_create_doctor().into())
    }

    pub fn close_modal(&self) -> Result<(), MediTrackError> {
        self.controller.lock()?.close_modal();
        Ok(())
    }

    /// The open modal with its pre-filled form, as JSON.
    pub fn modal_json(&self) -> Result<String, MediTrackError> {
        let controller = self.controller.lock()?;
        Ok(serde_json::to_string(controller.modal())?)
    }

    pub fn submit_medication(&self, form: FfiMedicationForm) -> Result<FfiOutcome, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.submit_medication(&form.into()).into())
    }

    pub fn submit_doctor(&self, form: FfiDoctorForm) -> Result<FfiOutcome, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.submit_doctor(&form.into()).into())
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn login(&self, email: String, password: String) -> Result<FfiOutcome, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.login(&LoginForm { email, password }).into())
    }

    pub fn signup(&self, form: FfiSignupForm) -> Result<FfiOutcome, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.signup(&form.into()).into())
    }

    pub fn logout(&self, prompt: Box<dyn ConfirmPrompt>) -> Result<FfiOutcome, MediTrackError> {
        let mut controller = self.controller.lock()?;
        let confirm = prompt_fn(prompt.as_ref());
        Ok(controller.logout(&confirm).into())
    }

    /// Locally stored identity.
    pub fn identity(&self) -> Result<Option<FfiIdentity>, MediTrackError> {
        Ok(self.controller.lock()?.identity().map(FfiIdentity::from))
    }

    /// Server-side session check.
    pub fn check_session(&self) -> Result<Option<FfiIdentity>, MediTrackError> {
        Ok(self.controller.lock()?.check_session().map(FfiIdentity::from))
    }

    // =========================================================================
    // Rendered Output
    // =========================================================================

    /// Containers that currently hold a rendered tree.
    pub fn container_names(&self) -> Result<Vec<String>, MediTrackError> {
        Ok(self.controller.lock()?.screen().container_names())
    }

    /// A container's tree as JSON, or `None` if nothing is mounted there.
    pub fn container_json(&self, container: String) -> Result<Option<String>, MediTrackError> {
        let controller = self.controller.lock()?;
        match controller.screen().get(&container) {
            Some(root) => Ok(Some(serde_json::to_string(root)?)),
            None => Ok(None),
        }
    }

    /// Flattened text of a container.
    pub fn container_text(&self, container: String) -> Result<String, MediTrackError> {
        Ok(self.controller.lock()?.screen().text(&container))
    }

    /// Unexpired notifications, oldest first.
    pub fn notifications(&self) -> Result<Vec<FfiNotification>, MediTrackError> {
        let mut controller = self.controller.lock()?;
        Ok(controller
            .notifications()
            .into_iter()
            .map(FfiNotification::from)
            .collect())
    }

    pub fn dismiss_notification(&self, id: String) -> Result<bool, MediTrackError> {
        Ok(self.controller.lock()?.dismiss_notification(&id))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe action outcome. `fields` names the rejected form fields.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiOutcome {
    Applied,
    Rejected { message: String, fields: Vec<String> },
    Failed { message: String },
    Cancelled,
    Ignored,
    ModalOpened,
    Navigate { url: String },
}

impl From<Outcome> for FfiOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Applied => FfiOutcome::Applied,
            Outcome::Rejected(e) => FfiOutcome::Rejected {
                fields: e.fields.iter().map(|f| f.field.clone()).collect(),
                message: e.message,
            },
            Outcome::Failed(e) => FfiOutcome::Failed {
                message: e.to_string(),
            },
            Outcome::Cancelled => FfiOutcome::Cancelled,
            Outcome::Ignored => FfiOutcome::Ignored,
            Outcome::ModalOpened => FfiOutcome::ModalOpened,
            Outcome::Navigate(url) => FfiOutcome::Navigate { url },
        }
    }
}

/// FFI-safe calendar entry. `period` is morning, afternoon, evening or night.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalendarEntry {
    pub day: u32,
    pub name: String,
    pub period: String,
    pub dosage: String,
    pub icon: Option<String>,
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub id: String,
    pub is_error: bool,
    pub message: String,
}

impl From<Notification> for FfiNotification {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            is_error: n.kind == NotificationKind::Error,
            message: n.message,
        }
    }
}

/// FFI-safe identity.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIdentity {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<Identity> for FfiIdentity {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id.to_string(),
            name: identity.name,
            email: identity.email,
            role: identity.role,
        }
    }
}

/// FFI-safe medication form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationForm {
    pub name: String,
    pub dosage: String,
    pub time: String,
    pub start_date: String,
    pub end_date: String,
    pub frequency: String,
    pub notes: String,
    pub prescriber_id: Option<String>,
}

impl From<FfiMedicationForm> for MedicationForm {
    fn from(form: FfiMedicationForm) -> Self {
        MedicationForm {
            name: form.name,
            dosage: form.dosage,
            time: form.time,
            start_date: form.start_date,
            end_date: form.end_date,
            frequency: form.frequency,
            notes: form.notes,
            prescriber_id: form
                .prescriber_id
                .filter(|id| !id.trim().is_empty())
                .map(RecordId::from),
        }
    }
}

/// FFI-safe doctor form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctorForm {
    pub name: String,
    pub specialty: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl From<FfiDoctorForm> for DoctorForm {
    fn from(form: FfiDoctorForm) -> Self {
        DoctorForm {
            name: form.name,
            specialty: form.specialty,
            phone: form.phone,
            email: form.email,
            address: form.address,
        }
    }
}

/// FFI-safe signup form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub contact: Option<String>,
}

impl From<FfiSignupForm> for SignupForm {
    fn from(form: FfiSignupForm) -> Self {
        SignupForm {
            name: form.name,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
            age: form.age,
            gender: form.gender,
            contact: form.contact,
        }
    }
}
