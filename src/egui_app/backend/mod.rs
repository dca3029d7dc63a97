//! Backend Binding
//!
//! The chat room never talks to the network directly. It holds an
//! `Arc<dyn ChatBackend>` (and the account screens an
//! `Arc<dyn AccountBackend>`), which keeps the feed and submission logic
//! independent of the transport and lets tests substitute a fake.
//!
//! Methods are blocking. Callers on the UI thread run them on a worker
//! thread and collect the result over a channel.
//!
//! - **`rest`** - HTTP implementation against the managed backend
//! - **`realtime`** - websocket change-notification subscription

pub mod realtime;
pub mod rest;

use std::fmt;
use std::sync::mpsc::Receiver;

use crate::shared::{ChangeEvent, ChatError, Message, NewMessage, ProfileUpdate, Session, SessionUser};

pub use realtime::SubscriptionStatus;
pub use rest::RestBackend;

/// Sort direction for page queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// One page of the message log, ordered by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl PageQuery {
    /// Newest-first page starting `offset` rows from the newest message
    pub fn newest_first(offset: usize, limit: usize) -> Self {
        Self {
            order: SortOrder::Descending,
            offset,
            limit,
        }
    }
}

/// Message log capabilities: query, insert, change notification
pub trait ChatBackend: Send + Sync {
    /// Fetch one page of messages
    fn select_page(&self, query: PageQuery) -> Result<Vec<Message>, ChatError>;

    /// Append a new message
    fn append(&self, message: &NewMessage) -> Result<(), ChatError>;

    /// Start receiving change notifications for `topic`
    fn subscribe(&self, topic: &str) -> Result<Subscription, ChatError>;
}

/// Identity and profile capabilities
pub trait AccountBackend: Send + Sync {
    /// Email a one-time login code / magic link
    fn request_login_code(&self, email: &str) -> Result<(), ChatError>;

    /// Exchange the emailed code for a session
    fn verify_login_code(&self, email: &str, code: &str) -> Result<Session, ChatError>;

    /// Revoke the current session
    fn sign_out(&self) -> Result<(), ChatError>;

    /// Store an avatar image and return its public URL
    fn upload_avatar(&self, file_name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ChatError>;

    /// Update the user's display name and avatar
    fn update_profile(&self, update: &ProfileUpdate) -> Result<SessionUser, ChatError>;
}

/// Handle to a live change subscription.
///
/// Events are buffered in a channel until polled. Dropping the handle
/// unsubscribes, so a torn-down view can never receive callbacks.
pub struct Subscription {
    topic: String,
    events: Receiver<ChangeEvent>,
    status: Option<Receiver<SubscriptionStatus>>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(
        topic: impl Into<String>,
        events: Receiver<ChangeEvent>,
        cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            topic: topic.into(),
            events,
            status: None,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Attach a transport status channel
    pub fn with_status(mut self, status: Receiver<SubscriptionStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Drain pending change events (non-blocking)
    pub fn poll_events(&self) -> Vec<ChangeEvent> {
        if self.cancel.is_none() {
            return Vec::new();
        }
        self.events.try_iter().collect()
    }

    /// Every transport status reported since the last poll, oldest first (non-blocking)
    pub fn poll_status(&self) -> Vec<SubscriptionStatus> {
        match self.status.as_ref() {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Release the subscription. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            tracing::info!("Unsubscribing from realtime topic '{}'", self.topic);
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("active", &self.is_active())
            .finish()
    }
}
