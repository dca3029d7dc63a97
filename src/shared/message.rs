/**
 * Chat Message Data Structures
 *
 * This module defines the row stored in the shared `chat` table and the
 * payload used to append a new row. Messages are immutable once written;
 * the backend assigns the identifier, and identifier order is the display
 * order.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::ChatError;
use crate::shared::user::SessionUser;

/// Longest accepted message body, in characters
pub const MAX_MESSAGE_CHARS: usize = 255;

/// A message as stored by the backend
///
/// # Fields
/// * `id` - Backend-assigned, monotonically increasing identifier
/// * `user_name` - Author display name at the time of posting
/// * `user_id` - Author user identifier
/// * `user_avatar_url` - Author avatar, if any
/// * `provider` - Identity provider the author signed in with, if known
/// * `message_content` - The message body
/// * `created_at` - Insert timestamp, when the backend returns one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub user_name: String,
    pub user_id: Uuid,
    #[serde(default)]
    pub user_avatar_url: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    pub message_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// First character of the author name, uppercased, for avatar placeholders
    pub fn initial(&self) -> String {
        self.user_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Insert payload for a new message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMessage {
    pub user_name: String,
    pub message_content: String,
    pub user_avatar_url: Option<String>,
    pub user_id: Uuid,
    pub provider: Option<String>,
}

impl NewMessage {
    /// Build a message authored by `user`
    ///
    /// The author name is resolved the same way the top bar shows it:
    /// preferred username, then name, then email.
    pub fn from_user(user: &SessionUser, content: impl Into<String>) -> Self {
        Self {
            user_name: user.display_name(),
            message_content: content.into(),
            user_avatar_url: user.avatar_url().map(str::to_string),
            user_id: user.id,
            provider: user.provider().map(str::to_string),
        }
    }
}

/// Number of characters in a message body
pub fn body_len(body: &str) -> usize {
    body.chars().count()
}

/// Check a body against the length limit
pub fn validate_body(body: &str, max_chars: usize) -> Result<(), ChatError> {
    let len = body_len(body);
    if len > max_chars {
        return Err(ChatError::validation(
            "message_content",
            format!("Message is {} characters long; the limit is {}", len, max_chars),
        ));
    }
    Ok(())
}
