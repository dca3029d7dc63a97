/**
 * Authentication Module
 *
 * State of the emailed-code login flow and the input checks run before any
 * request is made. The requests themselves go through `AccountBackend`.
 */

use crate::egui_app::types::AuthStep;
use crate::shared::{ChatError, Session, SessionUser};

/// Result delivered by a login worker
#[derive(Debug)]
pub enum AuthOutcome {
    /// The login code was emailed
    CodeSent(Result<(), ChatError>),
    /// The code was exchanged for a session
    Verified(Result<Session, ChatError>),
}

/// Authentication state
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub session: Option<Session>,
    pub step: AuthStep,
    pub error: Option<String>,
    /// Informational line under the form ("Check your email...")
    pub info: Option<String>,
    pub loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Replace the signed-in user after a profile update
    pub fn set_user(&mut self, user: SessionUser) {
        if let Some(session) = self.session.as_mut() {
            session.user = user;
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }
}

/// Basic shape check before asking the backend to send a code
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(()),
        _ => Err("Please enter a valid email address".to_string()),
    }
}

/// The emailed code must be non-empty digits
pub fn validate_code(code: &str) -> Result<(), String> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Enter the code from your email".to_string());
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("The code contains only digits".to_string());
    }
    Ok(())
}
