//! Session endpoints.

use meditrack_api::{
    Ack, ApiRequest, AuthStatus, LoginRequest, LoginResponse, Method, SignupRequest,
    SignupResponse,
};

use super::{ApiError, ApiGateway, ApiResult};
use crate::models::Identity;

impl ApiGateway<'_> {
    /// `POST /signup`. Does not sign the new user in.
    pub fn signup(&self, request: &SignupRequest) -> ApiResult<SignupResponse> {
        let request = Self::with_body(ApiRequest::new(Method::Post, "/signup"), request)?;
        self.send(request)
    }

    /// `POST /login`. The returned identity is persisted before this returns.
    pub fn login(&self, request: &LoginRequest) -> ApiResult<Identity> {
        let request = Self::with_body(ApiRequest::new(Method::Post, "/login"), request)?;
        let response: LoginResponse = self.send(request)?;

        let identity = Identity::from(response.user);
        self.db
            .save_identity(&identity)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        tracing::info!(user_id = %identity.user_id, "signed in");
        Ok(identity)
    }

    /// `GET /check-auth`. `None` when the server reports no session.
    pub fn check_auth(&self) -> ApiResult<Option<Identity>> {
        let status: AuthStatus = self.send(ApiRequest::new(Method::Get, "/check-auth"))?;
        Ok(if status.authenticated {
            status.user.map(Identity::from)
        } else {
            None
        })
    }

    /// `POST /logout`, then forget the local identity whatever the outcome.
    pub fn logout(&self) -> ApiResult<()> {
        let result = self.send::<Ack>(self.authed(Method::Post, "/logout"));
        if let Err(e) = self.db.clear_identity() {
            tracing::error!(error = %e, "failed to clear identity");
            return Err(ApiError::Storage(e.to_string()));
        }
        tracing::info!("signed out");
        result.map(|_| ())
    }
}
