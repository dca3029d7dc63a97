//! Chat Room State
//!
//! One mounted chat room: the feed, the composer and the live-change
//! subscription. Mounting subscribes and loads the newest page; `update`
//! runs once per frame on the UI thread; `teardown` (or drop) releases the
//! subscription so no change notification reaches a dead view.

use std::sync::Arc;
use std::time::Instant;

use super::submission::{SubmissionControl, SubmitRejected};
use super::synchronizer::FeedSynchronizer;
use crate::egui_app::backend::{ChatBackend, Subscription, SubscriptionStatus};
use crate::shared::{AppConfig, SessionUser};

/// Maximum number of lines kept in the connection log
const STATUS_LOG_LIMIT: usize = 200;

pub struct ChatRoom {
    pub feed: FeedSynchronizer,
    pub composer: SubmissionControl,
    subscription: Option<Subscription>,

    /// Latest transport status of the live-change subscription
    pub subscription_status: Option<SubscriptionStatus>,
    /// Recent status transitions, newest last
    pub status_log: Vec<String>,
    /// Whether to show the connection log window
    pub show_connection_log: bool,

    /// Scroll the list to the newest message on the next frame
    pub scroll_to_newest: bool,
    /// Whether the list was scrolled to the top last frame
    pub was_at_top: bool,

    notice: Option<String>,
}

impl ChatRoom {
    /// Subscribe to live changes and start loading the newest page
    pub fn mount(backend: Arc<dyn ChatBackend>, config: &AppConfig) -> Self {
        let mut room = Self {
            feed: FeedSynchronizer::new(Arc::clone(&backend), config.page_size),
            composer: SubmissionControl::new(Arc::clone(&backend), config.cooldown_secs, config.max_message_chars),
            subscription: None,
            subscription_status: None,
            status_log: Vec::new(),
            show_connection_log: false,
            scroll_to_newest: true,
            was_at_top: false,
            notice: None,
        };

        match backend.subscribe(&config.realtime_topic) {
            Ok(subscription) => room.subscription = Some(subscription),
            Err(e) => {
                // The feed still works without live updates
                tracing::warn!("Live updates unavailable: {}", e);
                room.record_status(SubscriptionStatus::Error(e.to_string()));
            }
        }

        room.feed.load_initial();
        room
    }

    /// Per-frame work. Returns true when something visible changed.
    pub fn update(&mut self, now: Instant) -> bool {
        let mut changed = false;

        let (events, statuses) = match self.subscription.as_ref() {
            Some(sub) => (sub.poll_events(), sub.poll_status()),
            None => (Vec::new(), Vec::new()),
        };
        if !events.is_empty() {
            tracing::debug!("{} change notification(s) received", events.len());
            // The refresh coalesces, so one call covers the whole batch
            self.feed.on_external_change();
        }
        for status in statuses {
            self.record_status(status);
            changed = true;
        }

        let was_empty = self.feed.messages().is_empty();
        if self.feed.poll() {
            changed = true;
            if was_empty {
                self.scroll_to_newest = true;
            }
        }

        if self.composer.poll(now) {
            changed = true;
        }
        if self.composer.take_scroll_request() {
            self.scroll_to_newest = true;
        }
        if let Some(notice) = self.composer.take_notice() {
            self.notice = Some(notice);
        }
        changed
    }

    /// Send the composer contents as `user`
    pub fn submit(&mut self, user: &SessionUser, now: Instant) -> Result<(), SubmitRejected> {
        let result = self.composer.submit(user, now);
        if let Err(ref rejected) = result {
            tracing::debug!("Submission rejected: {}", rejected);
        }
        result
    }

    /// Called by the message list when it is scrolled to the top.
    /// Only the transition into the top position requests a page.
    pub fn on_scrolled_to_top(&mut self, at_top: bool) {
        if at_top && !self.was_at_top {
            self.feed.load_older();
        }
        self.was_at_top = at_top;
    }

    /// Take a failure notice raised since the last call
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Whether the live-change subscription is held
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Release the subscription and drop all state
    pub fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.feed.reset();
        self.composer.reset();
        self.record_status(SubscriptionStatus::Disconnected);
    }

    fn record_status(&mut self, status: SubscriptionStatus) {
        if self.subscription_status.as_ref() != Some(&status) {
            let ts = chrono::Local::now().format("%H:%M:%S");
            self.status_log.push(format!("{} - {:?}", ts, status));
            if self.status_log.len() > STATUS_LOG_LIMIT {
                self.status_log.remove(0);
            }
        }
        self.subscription_status = Some(status);
    }
}

impl Drop for ChatRoom {
    fn drop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
