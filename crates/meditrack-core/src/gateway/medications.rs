//! Medication endpoints.

use meditrack_api::{
    Ack, MedicationCreated, MedicationRequest, MedicationsEnvelope, Method, MonthlyEnvelope,
    RecordId, StatusUpdateRequest,
};

use super::{ApiGateway, ApiResult};
use crate::models::{MedicationRecord, MedicationStatus};

fn records(envelope: MedicationsEnvelope) -> Vec<MedicationRecord> {
    envelope
        .medications
        .into_iter()
        .map(MedicationRecord::from)
        .collect()
}

impl ApiGateway<'_> {
    /// `GET /api/medications`. Raw server order, duplicates included.
    pub fn list_medications(&self) -> ApiResult<Vec<MedicationRecord>> {
        let envelope = self.send(self.authed(Method::Get, "/api/medications"))?;
        Ok(records(envelope))
    }

    /// `GET /api/medications/today`.
    pub fn today_medications(&self) -> ApiResult<Vec<MedicationRecord>> {
        let envelope = self.send(self.authed(Method::Get, "/api/medications/today"))?;
        Ok(records(envelope))
    }

    /// `GET /api/medications/monthly`, keyed by day of month.
    pub fn monthly_medications(&self, year: i32, month: u32) -> ApiResult<MonthlyEnvelope> {
        let request = self
            .authed(Method::Get, "/api/medications/monthly")
            .with_query("year", year.to_string())
            .with_query("month", month.to_string());
        self.send(request)
    }

    /// `POST /api/medications`.
    pub fn add_medication(&self, request: &MedicationRequest) -> ApiResult<MedicationCreated> {
        let request = Self::with_body(self.authed(Method::Post, "/api/medications"), request)?;
        self.send(request)
    }

    /// `PUT /api/medications/:id`.
    pub fn update_medication(&self, id: &RecordId, request: &MedicationRequest) -> ApiResult<Ack> {
        let path = format!("/api/medications/{}", id);
        let request = Self::with_body(self.authed(Method::Put, &path), request)?;
        self.send(request)
    }

    /// `PUT /api/medications/:id/status`.
    pub fn update_medication_status(
        &self,
        id: &RecordId,
        status: MedicationStatus,
    ) -> ApiResult<Ack> {
        let path = format!("/api/medications/{}/status", id);
        let body = StatusUpdateRequest {
            status: status.wire_value().to_string(),
        };
        let request = Self::with_body(self.authed(Method::Put, &path), &body)?;
        self.send(request)
    }

    /// `DELETE /api/medications/:id`.
    pub fn delete_medication(&self, id: &RecordId) -> ApiResult<Ack> {
        let path = format!("/api/medications/{}", id);
        self.send(self.authed(Method::Delete, &path))
    }

    /// `GET /api/my-medications`.
    pub fn my_medications(&self) -> ApiResult<Vec<MedicationRecord>> {
        let envelope = self.send(self.authed(Method::Get, "/api/my-medications"))?;
        Ok(records(envelope))
    }

    /// `GET /api/my-medications/search?q=`.
    pub fn search_my_medications(&self, query: &str) -> ApiResult<Vec<MedicationRecord>> {
        let request = self
            .authed(Method::Get, "/api/my-medications/search")
            .with_query("q", query);
        let envelope = self.send(request)?;
        Ok(records(envelope))
    }
}
