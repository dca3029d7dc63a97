//! Session and user types returned by the auth service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile fields the user controls
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserMetadata {
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Fields set by the auth service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppMetadata {
    #[serde(default)]
    pub provider: Option<String>,
}

/// The signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

impl SessionUser {
    /// Name shown next to the user's messages.
    ///
    /// Preferred username, then name, then email. Empty strings are skipped.
    pub fn display_name(&self) -> String {
        [
            self.user_metadata.preferred_username.as_deref(),
            self.user_metadata.name.as_deref(),
            self.email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("anonymous")
        .to_string()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.user_metadata
            .avatar_url
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn provider(&self) -> Option<&str> {
        self.app_metadata.provider.as_deref()
    }
}

/// An authenticated session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: SessionUser,
}

/// Body of a profile update request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub avatar_url: Option<String>,
}
