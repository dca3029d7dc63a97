use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

use crate::egui_app::auth::{self, AuthOutcome, AuthState};
use crate::egui_app::backend::{AccountBackend, ChatBackend, RestBackend};
use crate::egui_app::messaging::ChatRoom;
use crate::egui_app::profile::{ProfileEditor, ProfileOutcome, PROFILE_UPDATED};
use crate::egui_app::types::{AppView, AuthStep};
use crate::egui_app::worker::{self, JobPoll};
use crate::egui_app::Config;
use crate::shared::ChatError;

/// Central application state shared across egui views.
pub struct AppState {
    pub config: Config,
    chat_backend: Arc<dyn ChatBackend>,
    account_backend: Arc<dyn AccountBackend>,

    pub auth_state: AuthState,
    pub current_view: AppView,
    pub email_input: String,
    pub code_input: String,
    auth_result: Option<Receiver<AuthOutcome>>,

    /// Mounted while the chat view is shown
    pub chat_room: Option<ChatRoom>,
    pub profile: ProfileEditor,

    /// Blocking notice; the UI shows it in a modal until dismissed
    pub notice: Option<String>,
}

impl AppState {
    /// State backed by the HTTP backend described by `config`
    pub fn new(config: Config) -> Result<Self, ChatError> {
        let backend = Arc::new(RestBackend::new(config.clone())?);
        Ok(Self::with_backends(config, backend.clone(), backend))
    }

    pub fn with_backends(
        config: Config,
        chat_backend: Arc<dyn ChatBackend>,
        account_backend: Arc<dyn AccountBackend>,
    ) -> Self {
        Self {
            config,
            chat_backend,
            account_backend,
            auth_state: AuthState::new(),
            current_view: AppView::Auth,
            email_input: String::new(),
            code_input: String::new(),
            auth_result: None,
            chat_room: None,
            profile: ProfileEditor::new(),
            notice: None,
        }
    }

    /// Per-frame work: collect finished jobs and advance the chat room.
    /// Returns true when something visible changed.
    pub fn update(&mut self, now: Instant) -> bool {
        let mut changed = self.check_auth_result();

        if let Some(room) = self.chat_room.as_mut() {
            changed |= room.update(now);
            if let Some(notice) = room.take_notice() {
                self.notice = Some(notice);
            }
        }

        match self.profile.poll() {
            Some(ProfileOutcome::Updated(user)) => {
                self.auth_state.set_user(user);
                self.notice = Some(PROFILE_UPDATED.to_string());
                changed = true;
            }
            Some(ProfileOutcome::Failed(message)) => {
                self.notice = Some(message);
                changed = true;
            }
            None => {}
        }
        changed
    }

    /// When the next countdown tick is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.chat_room.as_ref().and_then(|room| room.composer.next_deadline())
    }

    pub fn check_auth_result(&mut self) -> bool {
        let polled = match self.auth_result.as_ref() {
            Some(rx) => worker::poll_job(rx),
            None => return false,
        };
        let outcome = match polled {
            JobPoll::Pending => return false,
            JobPoll::Ready(outcome) => outcome,
            JobPoll::Lost => AuthOutcome::CodeSent(Err(ChatError::network("login worker exited"))),
        };
        self.auth_result = None;
        self.auth_state.loading = false;

        match outcome {
            AuthOutcome::CodeSent(Ok(())) => {
                tracing::info!("Login code sent to {}", self.email_input.trim());
                self.auth_state.step = AuthStep::EnterCode;
                self.auth_state.info = Some("Check your email for the login code.".to_string());
                self.auth_state.error = None;
            }
            AuthOutcome::Verified(Ok(session)) => {
                tracing::info!("Signed in as {}", session.user.display_name());
                self.config.set_token(Some(session.access_token.clone()));
                self.auth_state.session = Some(session);
                self.auth_state.error = None;
                self.auth_state.info = None;
                self.code_input.clear();
                self.enter_chat();
            }
            AuthOutcome::CodeSent(Err(e)) | AuthOutcome::Verified(Err(e)) => {
                tracing::error!("Authentication failed: {}", e);
                self.auth_state.set_error(e.user_message());
            }
        }
        true
    }

    /// Ask the backend to email a login code
    pub fn handle_request_code(&mut self) {
        if let Err(e) = auth::validate_email(&self.email_input) {
            self.auth_state.set_error(e);
            return;
        }
        self.auth_state.loading = true;
        self.auth_state.error = None;

        let email = self.email_input.trim().to_string();
        let backend = Arc::clone(&self.account_backend);
        self.auth_result = Some(worker::run_in_background("auth-otp", move || {
            AuthOutcome::CodeSent(backend.request_login_code(&email))
        }));
    }

    /// Exchange the entered code for a session
    pub fn handle_verify_code(&mut self) {
        if let Err(e) = auth::validate_code(&self.code_input) {
            self.auth_state.set_error(e);
            return;
        }
        self.auth_state.loading = true;
        self.auth_state.error = None;

        let email = self.email_input.trim().to_string();
        let code = self.code_input.trim().to_string();
        let backend = Arc::clone(&self.account_backend);
        self.auth_result = Some(worker::run_in_background("auth-verify", move || {
            AuthOutcome::Verified(backend.verify_login_code(&email, &code))
        }));
    }

    /// Go back to the email step
    pub fn restart_login(&mut self) {
        self.auth_state.step = AuthStep::EnterEmail;
        self.auth_state.info = None;
        self.auth_state.clear_error();
        self.code_input.clear();
    }

    /// Mount the chat room for the signed-in user
    fn enter_chat(&mut self) {
        self.chat_room = Some(ChatRoom::mount(Arc::clone(&self.chat_backend), self.config.app()));
        self.current_view = AppView::Chat;
    }

    pub fn open_profile(&mut self) {
        if let Some(user) = self.auth_state.user() {
            self.profile.open_for(user);
        }
    }

    pub fn save_profile(&mut self) {
        let Some(user) = self.auth_state.user().cloned() else {
            return;
        };
        if let Err(message) = self.profile.submit(Arc::clone(&self.account_backend), &user) {
            self.notice = Some(message);
        }
    }

    /// End the session and tear the chat room down
    pub fn logout(&mut self) {
        if let Some(mut room) = self.chat_room.take() {
            room.teardown();
        }

        let backend = Arc::clone(&self.account_backend);
        // The local session is gone either way
        let _ = worker::run_in_background("auth-logout", move || {
            if let Err(e) = backend.sign_out() {
                tracing::warn!("Sign out request failed: {}", e);
            }
        });

        self.config.clear_token();
        self.auth_state = AuthState::new();
        self.current_view = AppView::Auth;
        self.code_input.clear();
        self.profile = ProfileEditor::new();
        tracing::info!("Signed out");
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
