//! Feed Window
//!
//! The slice of the message log currently held by the client, plus the
//! belief about whether older messages exist upstream. Pages arrive
//! newest-first; the window always stores them ascending by identifier with
//! duplicates removed, whichever order pages were applied in.

use crate::shared::Message;

/// Ordered, deduplicated window over the message log
#[derive(Debug, Clone)]
pub struct FeedWindow {
    messages: Vec<Message>,
    has_more: bool,
    page_size: usize,
}

impl FeedWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            messages: Vec::new(),
            has_more: false,
            page_size: page_size.max(1),
        }
    }

    /// Messages ascending by identifier
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether older messages may still exist upstream.
    ///
    /// A full page implies there may be more; a short page implies there
    /// are none. If the log holds an exact multiple of the page size, one
    /// extra (empty) fetch is needed before this turns false.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the whole window with the newest page (fetched newest-first)
    pub fn replace(&mut self, newest_first: Vec<Message>) {
        self.has_more = newest_first.len() == self.page_size;
        self.messages = newest_first;
        self.normalize();
    }

    /// Put an older page (fetched newest-first) in front of the window
    pub fn prepend(&mut self, newest_first: Vec<Message>) {
        self.has_more = newest_first.len() == self.page_size;
        let mut older = newest_first;
        older.reverse();
        older.append(&mut self.messages);
        self.messages = older;
        self.normalize();
    }

    /// Drop everything, as on view teardown
    pub fn clear(&mut self) {
        self.messages.clear();
        self.has_more = false;
    }

    /// Highest identifier held, if any
    pub fn newest_id(&self) -> Option<i64> {
        self.messages.last().map(|m| m.id)
    }

    // Pages taken at shifting offsets can overlap, and a replace can race
    // a prepend; sorting here keeps the invariant regardless.
    fn normalize(&mut self) {
        self.messages.sort_by_key(|m| m.id);
        self.messages.dedup_by_key(|m| m.id);
    }
}
