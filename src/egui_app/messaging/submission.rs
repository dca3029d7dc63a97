//! Submission Control
//!
//! Owns the composer input and gates sending on three conditions: no
//! submission in flight, no cooldown running, body within the length limit.
//!
//! ```text
//! Idle -> Sending -> Success -> Cooling(3, 2, 1) -> Idle
//!                 -> Failure -> Idle
//! ```

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::cooldown::Cooldown;
use crate::egui_app::backend::ChatBackend;
use crate::egui_app::worker::{self, JobPoll};
use crate::shared::message::body_len;
use crate::shared::{ChatError, NewMessage, SessionUser};

pub const PLACEHOLDER_IDLE: &str = "Type a message";
pub const BUTTON_IDLE: &str = "Send";
pub const BUTTON_SENDING: &str = "Sending...";

/// Why a submit was refused before reaching the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("A message is already being sent")]
    InFlight,

    #[error("Wait {0} seconds before sending again")]
    CoolingDown(u32),

    #[error("Message is {length} characters long; the limit is {max}")]
    TooLong { length: usize, max: usize },
}

/// Where the control is in its send cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending,
    Cooling(u32),
}

pub struct SubmissionControl {
    backend: Arc<dyn ChatBackend>,
    /// Composer text, bound to the input widget
    pub input: String,
    pending: Option<Receiver<Result<(), ChatError>>>,
    cooldown: Cooldown,
    cooldown_secs: u32,
    max_chars: usize,
    notice: Option<String>,
    scroll_requested: bool,
}

impl SubmissionControl {
    pub fn new(backend: Arc<dyn ChatBackend>, cooldown_secs: u32, max_chars: usize) -> Self {
        Self {
            backend,
            input: String::new(),
            pending: None,
            cooldown: Cooldown::new(),
            cooldown_secs,
            max_chars,
            notice: None,
            scroll_requested: false,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        if self.pending.is_some() {
            SubmitPhase::Sending
        } else if self.cooldown.is_active() {
            SubmitPhase::Cooling(self.cooldown.remaining())
        } else {
            SubmitPhase::Idle
        }
    }

    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }

    /// Seconds of cooldown left
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown.remaining()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Characters currently in the composer
    pub fn input_len(&self) -> usize {
        body_len(&self.input)
    }

    /// Whether the send button should be enabled
    pub fn can_submit(&self) -> bool {
        self.phase() == SubmitPhase::Idle
    }

    pub fn placeholder(&self) -> String {
        match self.cooldown.remaining() {
            0 => PLACEHOLDER_IDLE.to_string(),
            n => format!("Wait {} seconds", n),
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_sending() {
            BUTTON_SENDING
        } else {
            BUTTON_IDLE
        }
    }

    /// Send the composer contents as `user`.
    ///
    /// Refusals never touch the backend. On acceptance the insert runs on a
    /// worker thread and its outcome is picked up by `poll`.
    pub fn submit(&mut self, user: &SessionUser, now: Instant) -> Result<(), SubmitRejected> {
        self.cooldown.tick(now);
        if self.is_sending() {
            return Err(SubmitRejected::InFlight);
        }
        if self.cooldown.is_active() {
            return Err(SubmitRejected::CoolingDown(self.cooldown.remaining()));
        }
        let length = self.input_len();
        if length > self.max_chars {
            tracing::debug!("Submission refused: {} characters", length);
            return Err(SubmitRejected::TooLong {
                length,
                max: self.max_chars,
            });
        }

        let message = NewMessage::from_user(user, self.input.clone());
        let backend = Arc::clone(&self.backend);
        tracing::debug!("Sending message as '{}'", message.user_name);
        self.pending = Some(worker::run_in_background("chat-send", move || backend.append(&message)));
        Ok(())
    }

    /// Advance the cooldown and pick up a finished send.
    /// Returns true when anything visible changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let before = self.phase();
        self.cooldown.tick(now);

        let polled = match self.pending.as_ref() {
            Some(rx) => worker::poll_job(rx),
            None => return self.phase() != before,
        };
        self.finish(polled, now);
        self.phase() != before
    }

    /// Like `poll`, but blocks up to `timeout` for a send in flight
    pub fn wait(&mut self, timeout: Duration, now: Instant) {
        self.cooldown.tick(now);
        let polled = match self.pending.as_ref() {
            Some(rx) => worker::wait_job(rx, timeout),
            None => return,
        };
        self.finish(polled, now);
    }

    /// When the UI should wake up next for the countdown
    pub fn next_deadline(&self) -> Option<Instant> {
        self.cooldown.next_deadline()
    }

    /// Take the "scroll to newest" request raised by a successful send
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Take the failure notice, if a send failed
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Drop any send in flight and stop the countdown, as on teardown
    pub fn reset(&mut self) {
        self.pending = None;
        self.cooldown.cancel();
        self.notice = None;
        self.scroll_requested = false;
    }

    fn finish(&mut self, polled: JobPoll<Result<(), ChatError>>, now: Instant) {
        let result = match polled {
            JobPoll::Pending => return,
            JobPoll::Ready(result) => result,
            JobPoll::Lost => Err(ChatError::network("send worker exited without a result")),
        };
        self.pending = None;

        match result {
            Ok(()) => {
                tracing::info!("Message sent");
                self.input.clear();
                self.scroll_requested = true;
                self.cooldown.start(self.cooldown_secs, now);
            }
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                self.notice = Some(e.user_message());
            }
        }
    }
}
