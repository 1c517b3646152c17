//! Doctor mutations.

use super::{Confirm, DoctorModal, EditTarget, Modal, Outcome, PageController, PhaseEvent, RecordKey};
use crate::models::{DoctorForm, RecordId};

impl PageController {
    pub fn open_create_doctor(&mut self) -> Outcome {
        self.editing = None;
        self.modal = Modal::Doctor(DoctorModal::create());
        Outcome::ModalOpened
    }

    pub fn open_edit_doctor(&mut self, id: &RecordId) -> Outcome {
        let Some(doctor) = self.doctors.find(id) else {
            tracing::debug!(doctor_id = %id, "edit of unknown doctor");
            return Outcome::Ignored;
        };
        let modal = DoctorModal::edit(doctor);
        self.editing = Some(EditTarget::Doctor(id.clone()));
        self.modal = Modal::Doctor(modal);
        Outcome::ModalOpened
    }

    /// Create or update the doctor. An update also rewrites prescriber
    /// snapshots taken from that doctor.
    pub fn submit_doctor(&mut self, form: &DoctorForm) -> Outcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.notify_error(&e.message);
                return Outcome::Rejected(e);
            }
        };

        let (key, result, success) = match self.editing.clone() {
            Some(EditTarget::Doctor(id)) => {
                let key = RecordKey::Doctor(id.clone());
                if !self.begin(&key, PhaseEvent::BeginUpdate) {
                    return Outcome::Ignored;
                }
                let result = self.gateway().update_doctor(&id, &request);
                (key, result, "Doctor updated successfully!")
            }
            _ => {
                let key = RecordKey::NewDoctor;
                if !self.begin(&key, PhaseEvent::BeginCreate) {
                    return Outcome::Ignored;
                }
                let result = self.gateway().add_doctor(&request);
                (key, result, "Doctor added successfully!")
            }
        };

        match result {
            Ok(saved) => {
                if key == RecordKey::NewDoctor {
                    self.phases
                        .settle_create(&key, saved.doctor_id.map(RecordKey::Doctor));
                } else {
                    self.finish(&key, PhaseEvent::Succeeded);
                }
                self.load_doctors();
                if let RecordKey::Doctor(id) = &key {
                    self.refresh_prescribers(id);
                }
                self.close_modal();
                self.notify_success(success);
                Outcome::Applied
            }
            Err(e) => {
                self.finish(&key, PhaseEvent::Failed);
                self.notify_error(&e.user_message("Error saving doctor"));
                Outcome::Failed(e)
            }
        }
    }

    fn refresh_prescribers(&self, id: &RecordId) {
        let Some(doctor) = self.doctors.find(id) else {
            return;
        };
        match self.db.refresh_prescribers_for(doctor) {
            Ok(0) => {}
            Ok(count) => tracing::info!(doctor_id = %id, count, "prescriber snapshots refreshed"),
            Err(e) => tracing::warn!(doctor_id = %id, error = %e, "failed to refresh prescribers"),
        }
    }

    pub fn delete_doctor(&mut self, id: &RecordId, confirm: Confirm<'_>) -> Outcome {
        if self.doctors.find(id).is_none() {
            return Outcome::Ignored;
        }
        if !confirm("Are you sure you want to delete this doctor?") {
            return Outcome::Cancelled;
        }

        let key = RecordKey::Doctor(id.clone());
        if !self.begin(&key, PhaseEvent::BeginDelete) {
            return Outcome::Ignored;
        }

        match self.gateway().delete_doctor(id) {
            Ok(_) => {
                self.finish(&key, PhaseEvent::Succeeded);
                self.load_doctors();
                self.notify_success("Doctor deleted successfully!");
                Outcome::Applied
            }
            Err(e) => {
                self.finish(&key, PhaseEvent::Failed);
                self.notify_error(&e.user_message("Error deleting doctor"));
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
    use crate::models::PrescriberLink;
    use crate::page::Page;
    use crate::view::{Action, DOCTORS_COUNT, DOCTORS_GRID};
    use meditrack_api::{Method, MockTransport};
    use serde_json::json;

    fn loaded() -> (PageController, MockTransport) {
        let (mut controller, mock) = controller(Page::Doctors);
        mock.respond(
            Method::Get,
            "/api/doctors",
            200,
            json!({"success": true, "doctors": [{"id": 4, "name": "Dr. Adams", "specialty": "Cardiology"}]}),
        );
        controller.load_doctors();
        mock.clear_requests();
        (controller, mock)
    }

    fn form() -> DoctorForm {
        DoctorForm {
            name: "Dr. Adams".into(),
            specialty: "Neurology".into(),
            phone: "555-010-2030".into(),
            email: "adams@clinic.example".into(),
            address: String::new(),
        }
    }

    #[test]
    fn test_invalid_phone_sends_nothing() {
        let (mut controller, mock) = loaded();
        let outcome = controller.submit_doctor(&DoctorForm {
            phone: "12345".into(),
            ..form()
        });

        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(mock.request_count(), 0);
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Please enter a valid phone number"
        );
    }

    #[test]
    fn test_update_refreshes_prescriber_snapshots() {
        let (mut controller, mock) = loaded();
        let stale = PrescriberLink {
            doctor_id: Some(RecordId::from(4)),
            name: "Dr. Adams".into(),
            specialty: Some("Cardiology".into()),
        };
        controller.db().save_prescriber(&RecordId::from(7), &stale).unwrap();

        mock.respond(Method::Put, "/api/doctors/4", 200, json!({"message": "Doctor updated"}));
        mock.respond(
            Method::Get,
            "/api/doctors",
            200,
            json!({"doctors": [{"id": 4, "name": "Dr. Adams", "specialty": "Neurology"}]}),
        );

        let handler = controller
            .screen()
            .handlers_for(DOCTORS_GRID, &Action::EditDoctor(RecordId::from(4)))[0];
        assert_eq!(controller.dispatch(handler, &yes), Outcome::ModalOpened);
        assert_eq!(controller.submit_doctor(&form()), Outcome::Applied);

        let link = controller.db().get_prescriber(&RecordId::from(7)).unwrap().unwrap();
        assert_eq!(link.specialty.as_deref(), Some("Neurology"));
        assert!(!controller.modal().is_open());
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Doctor updated successfully!"
        );
    }

    #[test]
    fn test_create_reloads_grid() {
        let (mut controller, mock) = loaded();
        mock.respond(Method::Post, "/api/doctors", 201, json!({"doctor_id": 5}));
        mock.respond(
            Method::Get,
            "/api/doctors",
            200,
            json!({"doctors": [
                {"id": 4, "name": "Dr. Adams", "specialty": "Cardiology"},
                {"id": 5, "name": "Dr. Brown", "specialty": "Neurology"}
            ]}),
        );

        controller.open_create_doctor();
        assert_eq!(controller.submit_doctor(&form()), Outcome::Applied);
        assert_eq!(controller.doctors().len(), 2);
        assert_eq!(controller.screen().text(DOCTORS_COUNT), "2 doctors");
        assert_eq!(
            controller.phase(&RecordKey::Doctor(RecordId::from(5))),
            RecordPhase::Persisted
        );
    }

    #[test]
    fn test_delete_failure_uses_generic_message() {
        let (mut controller, mock) = loaded();
        mock.respond(Method::Delete, "/api/doctors/4", 404, json!({}));

        let outcome = controller.delete_doctor(&RecordId::from(4), &yes);
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(controller.doctors().len(), 1);
        assert_eq!(
            controller.last_notification().unwrap().message,
            "Error deleting doctor"
        );
        assert_eq!(
            controller.phase(&RecordKey::Doctor(RecordId::from(4))),
            RecordPhase::Persisted
        );
    }

    #[test]
    fn test_declined_delete() {
        let (mut controller, mock) = loaded();
        assert_eq!(controller.delete_doctor(&RecordId::from(4), &no), Outcome::Cancelled);
        assert_eq!(mock.request_count(), 0);
    }
}
