//! Doctor endpoints.

use meditrack_api::{Ack, DoctorRequest, DoctorSaved, DoctorsEnvelope, Method, RecordId};

use super::{ApiGateway, ApiResult};
use crate::models::DoctorRecord;

impl ApiGateway<'_> {
    /// `GET /api/doctors`. Raw server order, duplicates included.
    pub fn list_doctors(&self) -> ApiResult<Vec<DoctorRecord>> {
        let envelope: DoctorsEnvelope = self.send(self.authed(Method::Get, "/api/doctors"))?;
        Ok(envelope
            .doctors
            .into_iter()
            .map(DoctorRecord::from)
            .collect())
    }

    /// `POST /api/doctors`.
    pub fn add_doctor(&self, request: &DoctorRequest) -> ApiResult<DoctorSaved> {
        let request = Self::with_body(self.authed(Method::Post, "/api/doctors"), request)?;
        self.send(request)
    }

    /// `PUT /api/doctors/:id`.
    pub fn update_doctor(&self, id: &RecordId, request: &DoctorRequest) -> ApiResult<DoctorSaved> {
        let path = format!("/api/doctors/{}", id);
        let request = Self::with_body(self.authed(Method::Put, &path), request)?;
        self.send(request)
    }

    /// `DELETE /api/doctors/:id`.
    pub fn delete_doctor(&self, id: &RecordId) -> ApiResult<Ack> {
        let path = format!("/api/doctors/{}", id);
        self.send(self.authed(Method::Delete, &path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use meditrack_api::MockTransport;
    use serde_json::json;

    #[test]
    fn test_list_doctors() {
        let mock = MockTransport::new();
        let db = Database::open_in_memory().unwrap();
        mock.respond(
            Method::Get,
            "/api/doctors",
            200,
            json!({"success": true, "doctors": [
                {"id": 1, "name": "Dr. Adams", "specialty": "Cardiology", "phone": "555-010-2030"},
                {"id": 2, "name": "Dr. Brown", "specialty": null}
            ]}),
        );

        let doctors = ApiGateway::new(&mock, &db).list_doctors().unwrap();
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[1].specialty_label(), "General Practitioner");
    }

    #[test]
    fn test_update_doctor_path_and_body() {
        let mock = MockTransport::new();
        let db = Database::open_in_memory().unwrap();
        mock.respond(Method::Put, "/api/doctors/4", 200, json!({"message": "Doctor updated"}));

        let request = DoctorRequest {
            name: "Dr. Adams".into(),
            specialty: "Cardiology".into(),
            phone: "555-010-2030".into(),
            email: "adams@clinic.example".into(),
            address: String::new(),
        };
        ApiGateway::new(&mock, &db)
            .update_doctor(&RecordId::from(4), &request)
            .unwrap();

        let sent = mock.requests_to(Method::Put, "/api/doctors/4");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body.as_ref().unwrap()["specialty"], "Cardiology");
    }
}
