//! Feed Synchronizer
//!
//! Keeps the `FeedWindow` in step with the backend:
//!
//! - `load_initial` fetches the newest page and replaces the window
//! - `load_older` fetches the page before the oldest held message
//! - `on_external_change` refetches the newest page after a live change
//!
//! At most one fetch is in flight. A fetch stays in flight until `poll`
//! applies its result on the UI thread, so the window is only ever mutated
//! from one place. Overlapping `load_initial`/`load_older` calls are dropped;
//! change notifications received during a fetch collapse into a single
//! follow-up refresh.
//!
//! Every fetch carries a sequence number and results older than the last
//! applied one are discarded, so a slow response can never overwrite a
//! newer window.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use super::feed::FeedWindow;
use crate::egui_app::backend::{ChatBackend, PageQuery};
use crate::egui_app::worker::{self, JobPoll};
use crate::shared::{ChatError, Message};

/// Which operation issued a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Older,
}

struct PendingFetch {
    seq: u64,
    kind: FetchKind,
    receiver: Receiver<Result<Vec<Message>, ChatError>>,
}

pub struct FeedSynchronizer {
    backend: Arc<dyn ChatBackend>,
    window: FeedWindow,
    pending: Option<PendingFetch>,
    refresh_queued: bool,
    next_seq: u64,
    applied_seq: u64,
    last_error: Option<ChatError>,
}

impl FeedSynchronizer {
    pub fn new(backend: Arc<dyn ChatBackend>, page_size: usize) -> Self {
        Self {
            backend,
            window: FeedWindow::new(page_size),
            pending: None,
            refresh_queued: false,
            next_seq: 1,
            applied_seq: 0,
            last_error: None,
        }
    }

    /// Messages to render, ascending by identifier
    pub fn messages(&self) -> &[Message] {
        self.window.messages()
    }

    pub fn window(&self) -> &FeedWindow {
        &self.window
    }

    pub fn has_more(&self) -> bool {
        self.window.has_more()
    }

    /// Whether a fetch is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Kind of the fetch in flight, if any
    pub fn pending_kind(&self) -> Option<FetchKind> {
        self.pending.as_ref().map(|p| p.kind)
    }

    /// Whether a change notification is waiting for the current fetch
    pub fn is_refresh_queued(&self) -> bool {
        self.refresh_queued
    }

    /// Most recent fetch failure, cleared by the next successful fetch
    pub fn last_error(&self) -> Option<&ChatError> {
        self.last_error.as_ref()
    }

    /// Fetch the newest page. Returns false if a fetch was already in flight.
    pub fn load_initial(&mut self) -> bool {
        if self.is_busy() {
            tracing::debug!("load_initial dropped: fetch in flight");
            return false;
        }
        self.start(FetchKind::Initial);
        true
    }

    /// Fetch the page before the oldest held message.
    ///
    /// No-op while a fetch is in flight or when no older messages are
    /// believed to exist.
    pub fn load_older(&mut self) -> bool {
        if self.is_busy() {
            tracing::debug!("load_older dropped: fetch in flight");
            return false;
        }
        if !self.window.has_more() {
            return false;
        }
        self.start(FetchKind::Older);
        true
    }

    /// React to a live-change notification
    pub fn on_external_change(&mut self) {
        if self.is_busy() {
            if !self.refresh_queued {
                tracing::debug!("Change notification during fetch; refresh queued");
            }
            self.refresh_queued = true;
            return;
        }
        self.start(FetchKind::Initial);
    }

    /// Apply a finished fetch, if any. Returns true when the window changed.
    pub fn poll(&mut self) -> bool {
        let polled = match self.pending.as_ref() {
            Some(pending) => worker::poll_job(&pending.receiver),
            None => return false,
        };
        self.complete(polled)
    }

    /// Like `poll`, but blocks up to `timeout` for the fetch in flight.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let polled = match self.pending.as_ref() {
            Some(pending) => worker::wait_job(&pending.receiver, timeout),
            None => return false,
        };
        self.complete(polled)
    }

    /// Forget everything, as on view teardown. A fetch in flight is abandoned.
    pub fn reset(&mut self) {
        self.pending = None;
        self.refresh_queued = false;
        self.window.clear();
        self.last_error = None;
    }

    fn complete(&mut self, polled: JobPoll<Result<Vec<Message>, ChatError>>) -> bool {
        let changed = match polled {
            JobPoll::Pending => return false,
            JobPoll::Ready(result) => match self.pending.take() {
                Some(pending) => self.apply(pending.seq, pending.kind, result),
                None => false,
            },
            JobPoll::Lost => {
                self.pending = None;
                tracing::error!("Fetch failed: worker exited without a result");
                false
            }
        };

        if self.refresh_queued {
            self.refresh_queued = false;
            self.start(FetchKind::Initial);
        }
        changed
    }

    fn apply(&mut self, seq: u64, kind: FetchKind, result: Result<Vec<Message>, ChatError>) -> bool {
        if seq <= self.applied_seq {
            tracing::debug!("Discarding stale page #{} (applied #{})", seq, self.applied_seq);
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!("Applying {:?} page #{} with {} messages", kind, seq, page.len());
                self.applied_seq = seq;
                self.last_error = None;
                match kind {
                    FetchKind::Initial => self.window.replace(page),
                    FetchKind::Older => self.window.prepend(page),
                }
                true
            }
            Err(e) => {
                // The window and the "more available" flag stay as they were
                tracing::error!("Fetch failed ({:?}): {}", kind, e);
                self.last_error = Some(e);
                false
            }
        }
    }

    fn start(&mut self, kind: FetchKind) {
        let offset = match kind {
            FetchKind::Initial => 0,
            FetchKind::Older => self.window.len(),
        };
        let query = PageQuery::newest_first(offset, self.window.page_size());
        let seq = self.next_seq;
        self.next_seq += 1;

        let backend = Arc::clone(&self.backend);
        let receiver = worker::run_in_background("feed-fetch", move || backend.select_page(query));
        self.pending = Some(PendingFetch { seq, kind, receiver });
    }
}
