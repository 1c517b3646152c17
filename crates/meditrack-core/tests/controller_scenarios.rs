//! End-to-end page scenarios against a scripted server.

use std::cell::Cell;

use chrono::NaiveDate;
use meditrack_api::{Method, MockTransport};
use meditrack_core::controller::{Outcome, PageController, DEFAULT_NOTIFICATION_TTL_SECS};
use meditrack_core::db::Database;
use meditrack_core::models::{MedicationForm, RecordId};
use meditrack_core::page::{boot, Page};
use meditrack_core::schedule::{adherence_rate, FixedClock};
use meditrack_core::view::{Action, MEDICINE_LIST};
use serde_json::json;

fn yes(_: &str) -> bool {
    true
}

fn controller(page: Page) -> (PageController, MockTransport) {
    let mock = MockTransport::new();
    let now = NaiveDate::from_ymd_opt(2026, 10, 17)
        .unwrap()
        .and_hms_opt(7, 30, 0)
        .unwrap();
    let controller = PageController::new(
        page,
        Database::open_in_memory().unwrap(),
        Box::new(mock.clone()),
        Box::new(FixedClock::new(now)),
        DEFAULT_NOTIFICATION_TTL_SECS,
    );
    (controller, mock)
}

fn schedule_page() -> (PageController, MockTransport) {
    let (mut controller, mock) = controller(Page::MedicineSchedule);
    mock.respond(Method::Get, "/api/doctors", 200, json!({"success": true, "doctors": []}));
    mock.respond(
        Method::Get,
        "/api/medications/today",
        200,
        json!({"medications": [
            {"id": 3, "name": "Aspirin", "dosage": "100mg", "time": "2026-10-17 08:00:00", "status": "pending"},
            {"id": 7, "name": "Metformin", "dosage": "500mg", "time": "2026-10-17 19:00:00", "status": "pending"}
        ]}),
    );
    assert_eq!(boot(&mut controller, ""), None);
    mock.clear_requests();
    (controller, mock)
}

#[test]
fn test_duplicate_fetch_reconciles_before_stats() {
    let (mut controller, mock) = controller(Page::MedicineScheduleOverall);
    mock.respond(
        Method::Get,
        "/api/medications",
        200,
        json!({"medications": [
            {"id": 1, "status": "Pending"},
            {"id": 1, "status": "Pending"},
            {"id": 2, "status": "Completed"}
        ]}),
    );

    controller.load_medications();

    assert_eq!(controller.medications().len(), 2);
    assert_eq!(adherence_rate(controller.medications()), 50);
    let list = controller.screen().get(MEDICINE_LIST).unwrap();
    assert_eq!(list.find_by_class("medicine-item").len(), 2);
}

#[test]
fn test_declined_delete_issues_no_call() {
    let (mut controller, mock) = schedule_page();
    let before = controller.medications().to_vec();
    let generation = controller.screen().generation(MEDICINE_LIST);

    let asked = Cell::new(0);
    let decline = |_: &str| {
        asked.set(asked.get() + 1);
        false
    };
    let handler = controller
        .screen()
        .handlers_for(MEDICINE_LIST, &Action::DeleteMedication(RecordId::from(7)))[0];

    assert_eq!(controller.dispatch(handler, &decline), Outcome::Cancelled);
    assert_eq!(asked.get(), 1);
    assert_eq!(mock.request_count(), 0);
    assert_eq!(controller.medications(), before.as_slice());
    assert_eq!(controller.screen().generation(MEDICINE_LIST), generation);
}

#[test]
fn test_status_update_reloads_and_rerenders() {
    let (mut controller, mock) = schedule_page();
    let generation = controller.screen().generation(MEDICINE_LIST).unwrap();
    let mark = Action::MarkTaken(RecordId::from(3));
    let handler = controller.screen().handlers_for(MEDICINE_LIST, &mark)[0];

    mock.respond(Method::Put, "/api/medications/3/status", 200, json!({"success": true}));
    mock.respond(
        Method::Get,
        "/api/medications/today",
        200,
        json!({"medications": [
            {"id": 3, "name": "Aspirin", "dosage": "100mg", "time": "2026-10-17 08:00:00", "status": "taken"},
            {"id": 7, "name": "Metformin", "dosage": "500mg", "time": "2026-10-17 19:00:00", "status": "pending"}
        ]}),
    );

    assert_eq!(controller.dispatch(handler, &yes), Outcome::Applied);

    let sent = mock.requests_to(Method::Put, "/api/medications/3/status");
    assert_eq!(sent[0].body, Some(json!({"status": "taken"})));
    assert_eq!(mock.requests_to(Method::Get, "/api/medications/today").len(), 1);

    // A new tree was mounted; the old handler no longer dispatches
    assert!(controller.screen().generation(MEDICINE_LIST).unwrap() > generation);
    assert_eq!(controller.dispatch(handler, &yes), Outcome::Ignored);

    let list = controller.screen().get(MEDICINE_LIST).unwrap();
    let items = list.find_by_class("medicine-item");
    assert_eq!(items[0].attrs.get("data-id").map(String::as_str), Some("3"));
    assert!(items[0].text_content().contains("Taken"));
    assert!(items[1].text_content().contains("Upcoming"));
}

#[test]
fn test_failed_validation_issues_no_call() {
    let (mut controller, mock) = schedule_page();
    let before = controller.medications().to_vec();

    controller.open_create_medication();
    let form = MedicationForm {
        name: "Ibuprofen".into(),
        dosage: String::new(),
        time: "09:00".into(),
        start_date: "2026-10-17".into(),
        ..Default::default()
    };

    assert!(matches!(controller.submit_medication(&form), Outcome::Rejected(_)));
    assert_eq!(mock.request_count(), 0);
    assert_eq!(controller.medications(), before.as_slice());
    assert!(controller.modal().is_open());
}

#[test]
fn test_edit_intent_opens_prefilled_modal() {
    let (mut controller, mock) = controller(Page::MedicineSchedule);
    mock.respond(Method::Get, "/api/doctors", 200, json!({"doctors": []}));
    mock.respond(
        Method::Get,
        "/api/medications/today",
        200,
        json!({"medications": [
            {"id": 12, "name": "Aspirin", "dosage": "100mg", "time": "2026-10-17 08:00:00", "status": "pending"}
        ]}),
    );

    assert_eq!(
        boot(&mut controller, "?action=edit&id=12"),
        Some(Outcome::ModalOpened)
    );
    let modal = serde_json::to_value(controller.modal()).unwrap();
    assert_eq!(modal["Medication"]["title"], "Edit Medicine");
    assert_eq!(modal["Medication"]["form"]["time"], "08:00");
}

#[test]
fn test_unauthenticated_load_shows_error_and_empty_state() {
    let (mut controller, mock) = controller(Page::MedicineScheduleOverall);
    mock.respond(Method::Get, "/api/doctors", 401, json!({"error": "Not authenticated"}));
    mock.respond(Method::Get, "/api/medications", 401, json!({"error": "Not authenticated"}));

    boot(&mut controller, "");

    let sent = mock.requests_to(Method::Get, "/api/medications");
    assert_eq!(sent[0].header("Authorization"), Some("Bearer "));
    assert!(controller.medications().is_empty());
    let notifications = controller.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].message,
        "Failed to load medications: Not authenticated"
    );
}
