//! API gateway: every remote call behind one result contract.
//!
//! Each call attaches credentials derived from the stored identity, sends
//! through a [`Transport`], and folds every failure into [`ApiError`]. No
//! transport or decode error ever escapes as anything else.

mod auth;
mod doctors;
mod medications;

use meditrack_api::{error_message, parse_body, ApiRequest, Method, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::db::Database;

/// User-facing message for transport failures and malformed bodies.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Gateway errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Server unreachable, or the response was not the JSON we expected
    #[error("Network error. Please try again.")]
    Network,

    /// Non-2xx response
    #[error("Server error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Local storage failed while persisting session state
    #[error("Local storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Message for a notification: the server's own message when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Server { message: None, .. } | ApiError::Storage(_) => fallback.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway over a transport and the local identity store.
pub struct ApiGateway<'a> {
    transport: &'a dyn Transport,
    db: &'a Database,
}

impl<'a> ApiGateway<'a> {
    pub fn new(transport: &'a dyn Transport, db: &'a Database) -> Self {
        Self { transport, db }
    }

    /// Stored user id, or an empty string when signed out or unreadable.
    fn credential(&self) -> String {
        match self.db.load_identity() {
            Ok(Some(identity)) => identity.user_id.to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!(error = %e, "identity lookup failed, sending empty credential");
                String::new()
            }
        }
    }

    /// Build a request carrying both credential headers.
    fn authed(&self, method: Method, path: &str) -> ApiRequest {
        let user_id = self.credential();
        ApiRequest::new(method, path)
            .with_header("Authorization", format!("Bearer {}", user_id))
            .with_header("User-Id", user_id)
    }

    fn with_body<B: Serialize>(request: ApiRequest, body: &B) -> ApiResult<ApiRequest> {
        let path = request.path.clone();
        request.with_json(body).map_err(|e| {
            tracing::error!(error = %e, %path, "request body failed to encode");
            ApiError::Network
        })
    }

    /// Send a request and decode a 2xx body.
    fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let response = self.transport.send(&request).map_err(|e| {
            tracing::warn!(method = %request.method, path = %request.path, error = %e, "transport failed");
            ApiError::Network
        })?;

        if !response.is_success() {
            // A failure body that is not JSON at all is treated like a
            // dropped connection.
            if serde_json::from_str::<serde_json::Value>(&response.body).is_err() {
                tracing::warn!(method = %request.method, path = %request.path, status = response.status, "unreadable error body");
                return Err(ApiError::Network);
            }
            let message = error_message(&response.body);
            tracing::info!(method = %request.method, path = %request.path, status = response.status, ?message, "server rejected request");
            return Err(ApiError::Server {
                status: response.status,
                message,
            });
        }

        parse_body(&response.body).map_err(|e| {
            tracing::warn!(method = %request.method, path = %request.path, error = %e, "malformed response body");
            ApiError::Network
        })
    }
}
