//! Medication mutations.

use super::{Confirm, EditTarget, MedicationModal, Modal, Outcome, PageController, PhaseEvent, RecordKey};
use crate::models::{MedicationForm, MedicationRecord, MedicationStatus, PrescriberLink, RecordId};
use crate::page::Page;

impl PageController {
    fn find_medication(&self, id: &RecordId) -> Option<&MedicationRecord> {
        self.medications.find(id).or_else(|| self.today.find(id))
    }

    /// Move `key` through `event`, or report why the action is ignored.
    pub(super) fn begin(&mut self, key: &RecordKey, event: PhaseEvent) -> bool {
        match self.phases.apply(key, event) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(record = %key, error = %e, "mutation ignored");
                false
            }
        }
    }

    pub(super) fn finish(&mut self, key: &RecordKey, event: PhaseEvent) {
        if let Err(e) = self.phases.apply(key, event) {
            tracing::warn!(record = %key, error = %e, "phase out of step");
        }
    }

    pub fn open_create_medication(&mut self) -> Outcome {
        let now = self.clock.now();
        self.editing = None;
        self.modal = Modal::Medication(MedicationModal::create(now));
        Outcome::ModalOpened
    }

    /// Pre-fill the modal from the cached record. Unknown ids do nothing.
    pub fn open_edit_medication(&mut self, id: &RecordId) -> Outcome {
        let Some(record) = self.find_medication(id).cloned() else {
            tracing::debug!(medication_id = %id, "edit of unknown medication");
            return Outcome::Ignored;
        };
        let link = self.db.get_prescriber(id).unwrap_or_else(|e| {
            tracing::warn!(medication_id = %id, error = %e, "prescriber unreadable");
            None
        });

        let now = self.clock.now();
        self.editing = Some(EditTarget::Medication(id.clone()));
        self.modal = Modal::Medication(MedicationModal::edit(&record, link.as_ref(), now));
        Outcome::ModalOpened
    }

    fn prescriber_from_form(&self, form: &MedicationForm) -> Option<PrescriberLink> {
        let doctor_id = form.prescriber_id.as_ref()?;
        self.doctors.find(doctor_id).map(PrescriberLink::from)
    }

    fn link_prescriber(&self, medication_id: &RecordId, link: Option<PrescriberLink>) {
        let Some(link) = link else {
            return;
        };
        if let Err(e) = self.db.save_prescriber(medication_id, &link) {
            tracing::warn!(%medication_id, error = %e, "failed to save prescriber");
        }
    }

    /// Create or update, depending on what the open modal is editing.
    pub fn submit_medication(&mut self, form: &MedicationForm) -> Outcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.notify_error(&e.message);
                return Outcome::Rejected(e);
            }
        };
        let link = self.prescriber_from_form(form);

        match self.editing.clone() {
            Some(EditTarget::Medication(id)) => {
                let key = RecordKey::Medication(id.clone());
                if !self.begin(&key, PhaseEvent::BeginUpdate) {
                    return Outcome::Ignored;
                }
                match self.gateway().update_medication(&id, &request) {
                    Ok(_) => {
                        self.finish(&key, PhaseEvent::Succeeded);
                        self.link_prescriber(&id, link);
                        self.notify_success("Medication updated successfully!");
                        self.close_modal();
                        self.reload();
                        Outcome::Applied
                    }
                    Err(e) => {
                        self.finish(&key, PhaseEvent::Failed);
                        self.notify_error(&e.user_message("Failed to update medication"));
                        Outcome::Failed(e)
                    }
                }
            }
            _ => {
                let key = RecordKey::NewMedication;
                if !self.begin(&key, PhaseEvent::BeginCreate) {
                    return Outcome::Ignored;
                }
                match self.gateway().add_medication(&request) {
                    Ok(created) => {
                        let new_key = created.medicine_id.clone().map(RecordKey::Medication);
                        self.phases.settle_create(&key, new_key);
                        if let Some(id) = &created.medicine_id {
                            self.link_prescriber(id, link);
                        }
                        tracing::info!(
                            medicine_id = ?created.medicine_id,
                            reminders = created.reminders_created,
                            "medication added"
                        );
                        let message = format!(
                            "Medication added with {} reminders!",
                            created.reminders_created
                        );
                        self.notify_success(&message);
                        self.close_modal();
                        self.reload();
                        Outcome::Applied
                    }
                    Err(e) => {
                        self.finish(&key, PhaseEvent::Failed);
                        self.notify_error(&e.user_message("Failed to add medication"));
                        Outcome::Failed(e)
                    }
                }
            }
        }
    }

    pub fn mark_taken(&mut self, id: &RecordId) -> Outcome {
        if self.find_medication(id).is_none() {
            return Outcome::Ignored;
        }
        let key = RecordKey::Medication(id.clone());
        if !self.begin(&key, PhaseEvent::BeginUpdate) {
            return Outcome::Ignored;
        }

        match self.gateway().update_medication_status(id, MedicationStatus::Completed) {
            Ok(_) => {
                self.finish(&key, PhaseEvent::Succeeded);
                self.notify_success("Medicine marked as taken!");
                self.reload();
                Outcome::Applied
            }
            Err(e) => {
                self.finish(&key, PhaseEvent::Failed);
                self.notify_error(&e.user_message("Failed to update status"));
                Outcome::Failed(e)
            }
        }
    }

    /// Delete after confirmation. Declining sends nothing.
    pub fn delete_medication(&mut self, id: &RecordId, confirm: Confirm<'_>) -> Outcome {
        if self.find_medication(id).is_none() {
            return Outcome::Ignored;
        }
        let my_medications = self.page == Page::MyMedications;
        let prompt = if my_medications {
            "Are you sure you want to delete this medication?"
        } else {
            "Are you sure you want to delete this medicine?"
        };
        if !confirm(prompt) {
            return Outcome::Cancelled;
        }

        let key = RecordKey::Medication(id.clone());
        if !self.begin(&key, PhaseEvent::BeginDelete) {
            return Outcome::Ignored;
        }

        match self.gateway().delete_medication(id) {
            Ok(_) => {
                self.finish(&key, PhaseEvent::Succeeded);
                if let Err(e) = self.db.remove_prescriber(id) {
                    tracing::warn!(medication_id = %id, error = %e, "failed to drop prescriber");
                }
                self.notify_success(if my_medications {
                    "Medication deleted successfully!"
                } else {
                    "Medicine deleted successfully!"
                });
                self.reload();
                Outcome::Applied
            }
            Err(e) => {
                self.finish(&key, PhaseEvent::Failed);
                let fallback = if my_medications {
                    "Failed to delete medication"
                } else {
                    "Failed to delete medicine"
                };
                self.notify_error(&e.user_message(fallback));
                Outcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::RecordPhase;
    use super::*;
    use crate::view::{Action, MEDICINE_LIST};
    use meditrack_api::Method;
    use serde_json::json;
    use std::cell::RefCell;

    fn loaded(page: Page) -> (PageController, meditrack_api::MockTransport) {
        let (mut controller, mock) = controller(page);
        mock.respond(
            Method::Get,
            "/api/medications",
            200,
            json!({"medications": [
                {"id": 7, "name": "Aspirin", "dosage": "100mg", "time": "2026-10-17 08:05:00", "status": "pending"}
            ]}),
        );
        controller.load_medications();
        mock.clear_requests();
        (controller, mock)
    }

    fn form() -> MedicationForm {
        MedicationForm {
            name: "Ibuprofen".into(),
            dosage: "200mg".into(),
            time: "09:00".into(),
            start_date: "2026-10-17".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejected_form_sends_nothing() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        let outcome = controller.submit_medication(&MedicationForm::default());

        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(mock.request_count(), 0);
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Please fill in all required fields"
        );
        assert_eq!(controller.medications().len(), 1);
    }

    #[test]
    fn test_create_links_prescriber_and_reloads() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        mock.respond(Method::Get, "/api/doctors", 200, json!({"doctors": [{"id": 3, "name": "Dr. Adams", "specialty": "Cardiology"}]}));
        controller.load_doctors();
        mock.respond(
            Method::Post,
            "/api/medications",
            201,
            json!({"medicine_id": 12, "reminders_created": 8}),
        );

        controller.open_create_medication();
        let form = MedicationForm {
            prescriber_id: Some(RecordId::from(3)),
            ..form()
        };
        assert_eq!(controller.submit_medication(&form), Outcome::Applied);

        assert!(!controller.modal().is_open());
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Medication added with 8 reminders!"
        );
        let link = controller.db().get_prescriber(&RecordId::from(12)).unwrap().unwrap();
        assert_eq!(link.label(), "Dr. Adams (Cardiology)");
        assert_eq!(mock.requests_to(Method::Get, "/api/medications").len(), 1);
        assert_eq!(
            controller.phase(&RecordKey::NewMedication),
            RecordPhase::Absent
        );
    }

    #[test]
    fn test_update_failure_keeps_modal_and_list() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        mock.respond(Method::Put, "/api/medications/7", 500, json!({"error": "Database error"}));

        assert_eq!(controller.open_edit_medication(&RecordId::from(7)), Outcome::ModalOpened);
        let generation = controller.screen().generation(MEDICINE_LIST);
        let outcome = controller.submit_medication(&form());

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(controller.modal().is_open());
        assert_eq!(controller.last_notification().unwrap().message, "Database error");
        assert_eq!(controller.screen().generation(MEDICINE_LIST), generation);
        assert_eq!(
            controller.phase(&RecordKey::Medication(RecordId::from(7))),
            RecordPhase::Persisted
        );
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let (mut controller, _mock) = loaded(Page::MedicineScheduleOverall);
        assert_eq!(controller.open_edit_medication(&RecordId::from(99)), Outcome::Ignored);
        assert!(!controller.modal().is_open());
        assert!(controller.editing().is_none());
    }

    #[test]
    fn test_declined_delete_sends_nothing() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        let prompts = RefCell::new(Vec::new());
        let decline = |text: &str| {
            prompts.borrow_mut().push(text.to_string());
            false
        };

        assert_eq!(controller.delete_medication(&RecordId::from(7), &decline), Outcome::Cancelled);
        assert_eq!(mock.request_count(), 0);
        assert_eq!(
            prompts.into_inner(),
            vec!["Are you sure you want to delete this medicine?".to_string()]
        );
    }

    #[test]
    fn test_delete_removes_prescriber() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        let link = PrescriberLink {
            doctor_id: None,
            name: "Dr. Lee".into(),
            specialty: None,
        };
        controller.db().save_prescriber(&RecordId::from(7), &link).unwrap();
        mock.respond(Method::Delete, "/api/medications/7", 200, json!({"success": true}));
        mock.respond(Method::Get, "/api/medications", 200, json!({"medications": []}));

        assert_eq!(controller.delete_medication(&RecordId::from(7), &yes), Outcome::Applied);
        assert!(controller.db().get_prescriber(&RecordId::from(7)).unwrap().is_none());
        assert!(controller.medications().is_empty());
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Medicine deleted successfully!"
        );
    }

    #[test]
    fn test_delete_settles_before_returning() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        mock.respond(Method::Delete, "/api/medications/7", 200, json!({"success": true}));
        mock.respond(Method::Get, "/api/medications", 200, json!({"medications": []}));

        let key = RecordKey::Medication(RecordId::from(7));
        assert_eq!(controller.phase(&key), RecordPhase::Persisted);
        assert_eq!(controller.delete_medication(&RecordId::from(7), &yes), Outcome::Applied);
        assert_eq!(controller.phase(&key), RecordPhase::Absent);

        // The record is gone, so a repeat delete never reaches the server
        assert_eq!(controller.delete_medication(&RecordId::from(7), &yes), Outcome::Ignored);
        assert_eq!(mock.requests_to(Method::Delete, "/api/medications/7").len(), 1);
    }

    #[test]
    fn test_mark_taken_network_failure() {
        let (mut controller, mock) = loaded(Page::MedicineScheduleOverall);
        mock.fail(Method::Put, "/api/medications/7/status");

        let handler = controller
            .screen()
            .handlers_for(MEDICINE_LIST, &Action::MarkTaken(RecordId::from(7)))[0];
        let outcome = controller.dispatch(handler, &no);

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Network error. Please try again."
        );
    }
}
