//! Sign-in, sign-up and sign-out.

use super::{Confirm, Outcome, PageController};
use crate::models::{Identity, LoginForm, SignupForm};
use crate::page::{ADMIN_DASHBOARD_PAGE, DASHBOARD_PAGE, LOGIN_PAGE};

impl PageController {
    /// Sign in and persist the identity. Success navigates to the
    /// dashboard matching the user's role.
    pub fn login(&mut self, form: &LoginForm) -> Outcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.notify_error(&e.message);
                return Outcome::Rejected(e);
            }
        };

        match self.gateway().login(&request) {
            Ok(identity) => {
                self.notify_success("Login successful!");
                let target = if identity.is_admin() {
                    ADMIN_DASHBOARD_PAGE
                } else {
                    DASHBOARD_PAGE
                };
                Outcome::Navigate(target.to_string())
            }
            Err(e) => {
                self.notify_error(&e.user_message("Login failed"));
                Outcome::Failed(e)
            }
        }
    }

    /// Create an account. The new user still has to sign in.
    pub fn signup(&mut self, form: &SignupForm) -> Outcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.notify_error(&e.message);
                return Outcome::Rejected(e);
            }
        };

        match self.gateway().signup(&request) {
            Ok(response) => {
                tracing::info!(user_id = ?response.user_id, "account created");
                self.notify_success("Account created successfully! Please login.");
                Outcome::Navigate(LOGIN_PAGE.to_string())
            }
            Err(e) => {
                self.notify_error(&e.user_message("Signup failed"));
                Outcome::Failed(e)
            }
        }
    }

    /// Sign out after confirmation. The local identity is cleared even when
    /// the server call fails.
    pub fn logout(&mut self, confirm: Confirm<'_>) -> Outcome {
        if !confirm("Are you sure you want to log out?") {
            return Outcome::Cancelled;
        }
        if let Err(e) = self.gateway().logout() {
            tracing::warn!(error = %e, "logout call failed");
        }
        self.screen.clear();
        Outcome::Navigate(LOGIN_PAGE.to_string())
    }

    /// Ask the server whether the session is still valid. Any failure reads
    /// as signed out.
    pub fn check_session(&self) -> Option<Identity> {
        match self.gateway().check_auth() {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "auth check failed");
                None
            }
        }
    }
}
