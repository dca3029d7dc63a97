//! Application configuration module
//!
//! Provides the backend coordinates and the tunables of the chat room.
//! Values come from a TOML file, then environment variables, then the
//! builder defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Default backend URL (a locally running backend stack)
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";
/// Default number of messages per page
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Default cooldown after a successful submission, in seconds
pub const DEFAULT_COOLDOWN_SECS: u32 = 3;
/// Default limit for one backend request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Environment variable overriding the backend URL
pub const ENV_BACKEND_URL: &str = "ROOMCHAT_BACKEND_URL";
/// Environment variable overriding the anonymous API key
pub const ENV_ANON_KEY: &str = "ROOMCHAT_ANON_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the managed backend
    pub backend_url: Url,
    /// Public (anonymous) API key sent with every request
    pub anon_key: String,
    /// Table holding chat messages
    pub table: String,
    /// Realtime topic the room subscribes to
    pub realtime_topic: String,
    /// Storage bucket for avatars
    pub avatar_bucket: String,
    /// Messages fetched per page
    pub page_size: usize,
    /// Seconds submission stays disabled after a successful send
    pub cooldown_secs: u32,
    /// Longest accepted message body, in characters
    pub max_message_chars: usize,
    /// Seconds before a backend request is abandoned
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Full URL for a backend path such as `/rest/v1/chat`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url.as_str().trim_end_matches('/'), path)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Default config file location (`<config dir>/roomchat/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("roomchat").join("config.toml"))
    }

    /// Load from `path` if it exists, apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(p) if p.exists() => {
                let text = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError::Io(format!("{}: {}", p.display(), e)))?;
                AppConfigBuilder::from_toml_str(&text)?
            }
            _ => AppConfigBuilder::default(),
        };
        builder.with_env().build()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            anon_key: String::new(),
            table: "chat".to_string(),
            realtime_topic: "chat".to_string(),
            avatar_bucket: "avatars".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            max_message_chars: crate::shared::message::MAX_MESSAGE_CHARS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_backend_url() -> Url {
    match Url::parse(DEFAULT_BACKEND_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("DEFAULT_BACKEND_URL is a valid URL"),
    }
}

/// Builder for AppConfig
///
/// Every field is optional; unset fields keep the `AppConfig::default()` value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfigBuilder {
    backend_url: Option<String>,
    anon_key: Option<String>,
    table: Option<String>,
    realtime_topic: Option<String>,
    avatar_bucket: Option<String>,
    page_size: Option<usize>,
    cooldown_secs: Option<u32>,
    max_message_chars: Option<usize>,
    request_timeout_secs: Option<u64>,
}

impl AppConfigBuilder {
    /// Parse a builder from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Set the backend URL
    pub fn backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    /// Set the anonymous API key
    pub fn anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn realtime_topic(mut self, topic: impl Into<String>) -> Self {
        self.realtime_topic = Some(topic.into());
        self
    }

    pub fn avatar_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.avatar_bucket = Some(bucket.into());
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn cooldown_secs(mut self, secs: u32) -> Self {
        self.cooldown_secs = Some(secs);
        self
    }

    pub fn max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = Some(max);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Apply `ROOMCHAT_BACKEND_URL` and `ROOMCHAT_ANON_KEY` when set
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }
        if let Ok(key) = std::env::var(ENV_ANON_KEY) {
            self.anon_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();

        let backend_url = match self.backend_url {
            Some(raw) => {
                let url = Url::parse(raw.trim())
                    .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::InvalidUrl(format!(
                        "{}: scheme must be http or https",
                        raw
                    )));
                }
                url
            }
            None => defaults.backend_url,
        };

        let page_size = self.page_size.unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(ConfigError::InvalidValue("page_size must be at least 1"));
        }
        let max_message_chars = self.max_message_chars.unwrap_or(defaults.max_message_chars);
        if max_message_chars == 0 {
            return Err(ConfigError::InvalidValue("max_message_chars must be at least 1"));
        }

        let request_timeout_secs = self.request_timeout_secs.unwrap_or(defaults.request_timeout_secs);
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("request_timeout_secs must be at least 1"));
        }

        let non_empty = |value: Option<String>, default: String, name: &'static str| {
            match value {
                Some(v) if v.trim().is_empty() => Err(ConfigError::MissingValue(name)),
                Some(v) => Ok(v),
                None => Ok(default),
            }
        };

        Ok(AppConfig {
            backend_url,
            anon_key: self.anon_key.unwrap_or(defaults.anon_key),
            table: non_empty(self.table, defaults.table, "table")?,
            realtime_topic: non_empty(self.realtime_topic, defaults.realtime_topic, "realtime_topic")?,
            avatar_bucket: non_empty(self.avatar_bucket, defaults.avatar_bucket, "avatar_bucket")?,
            page_size,
            cooldown_secs: self.cooldown_secs.unwrap_or(defaults.cooldown_secs),
            max_message_chars,
            request_timeout_secs,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("failed to parse config file: {0}")]
    Parse(String),
    #[error("failed to read config file: {0}")]
    Io(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
