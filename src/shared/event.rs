/**
 * Live Change Events
 *
 * A change event tells the client that the message log may have changed.
 * The feed treats every event the same way (refetch the newest page), so
 * the fields below are informational and used for logging only.
 */
use serde::{Deserialize, Serialize};

/// Kind of row change reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// Anything else, including resynchronisation after a reconnect
    #[serde(other)]
    Unknown,
}

/// A live-change notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub table: Option<String>,
    pub commit_timestamp: Option<String>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind) -> Self {
        Self {
            kind,
            table: None,
            commit_timestamp: None,
        }
    }

    /// Event emitted after the transport re-joined and may have missed changes
    pub fn resync() -> Self {
        Self::new(ChangeKind::Unknown)
    }

    /// Read a `postgres_changes` payload.
    ///
    /// The realtime service wraps the row change in a `data` object; older
    /// servers put the fields at the top level. Missing fields are tolerated.
    pub fn from_postgres_changes(payload: &serde_json::Value) -> Self {
        let data = payload.get("data").unwrap_or(payload);
        let kind = data
            .get("type")
            .or_else(|| data.get("eventType"))
            .and_then(|v| serde_json::from_value::<ChangeKind>(v.clone()).ok())
            .unwrap_or(ChangeKind::Unknown);
        let text = |key: &str| data.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            kind,
            table: text("table"),
            commit_timestamp: text("commit_timestamp"),
        }
    }
}
