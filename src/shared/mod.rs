//! Shared Module
//!
//! Types that describe the chat room independently of any UI: the rows
//! stored by the backend, the change notifications it pushes, the signed-in
//! user, configuration and errors.

/// Message rows and insert payloads
pub mod message;

/// Live-change notifications
pub mod event;

/// Session and user types
pub mod user;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use message::{Message, NewMessage, MAX_MESSAGE_CHARS};
pub use event::{ChangeEvent, ChangeKind};
pub use user::{ProfileUpdate, Session, SessionUser};
pub use error::ChatError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
