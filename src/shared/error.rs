//! Shared Error Types
//!
//! This module defines the error type returned by every backend-facing
//! operation in the client: page queries, inserts, realtime subscriptions,
//! login and profile updates.
//!
//! # Error Categories
//!
//! - `Network` - the request never produced an HTTP response
//! - `Backend` - the backend answered with a non-success status
//! - `Serialization` - JSON encoding/decoding failures
//! - `Validation` - input rejected before anything was sent
//! - `NotAuthenticated` - an operation needs a session and none exists
//! - `Subscription` - realtime channel failures
//! - `Io` - local file access (avatar uploads)
//!
//! # Usage
//!
//! ```rust
//! use roomchat::shared::error::ChatError;
//!
//! let error = ChatError::validation("message_content", "Message is too long");
//! assert!(error.to_string().contains("message_content"));
//! ```
use thiserror::Error;

/// Errors produced while talking to the chat backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// The backend rejected the request
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// No session token is available
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Realtime subscription failure
    #[error("Subscription error: {message}")]
    Subscription {
        /// Human-readable error message
        message: String,
    },

    /// Local I/O failure
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
    },
}

impl ChatError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new backend error
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new subscription error
    pub fn subscription(message: impl Into<String>) -> Self {
        Self::Subscription {
            message: message.into(),
        }
    }

    /// Text suitable for a user-facing notice.
    ///
    /// Backend errors carry the backend's own message; everything else
    /// falls back to the `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::NotAuthenticated => "You are not signed in.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::serialization(format!("Failed to parse response: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ChatError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::subscription(err.to_string())
    }
}
