//! Messaging Module
//!
//! The single chat room: feed synchronization, message submission and the
//! components that render them.

pub mod feed;
pub mod synchronizer;
pub mod cooldown;
pub mod submission;
pub mod state;
pub mod components;

pub use feed::FeedWindow;
pub use synchronizer::{FeedSynchronizer, FetchKind};
pub use cooldown::Cooldown;
pub use submission::{SubmissionControl, SubmitPhase, SubmitRejected};
pub use state::ChatRoom;
