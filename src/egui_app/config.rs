use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Application configuration wrapper.
///
/// Couples the static `AppConfig` with the access token of the current
/// session, which only exists after login.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
    token: Option<String>,
}

impl Config {
    /// Configuration from the default config file and environment.
    ///
    /// Falls back to built-in defaults (and logs why) when the file is invalid.
    pub fn new() -> Self {
        let path = AppConfig::default_path();
        match AppConfig::load(path.as_deref()) {
            Ok(app) => Self { app, token: None },
            Err(e) => {
                tracing::warn!("Ignoring invalid configuration: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_app(app: AppConfig) -> Self {
        Self { app, token: None }
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self::from_app(builder.build()?))
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Set the session access token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the session access token
    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    /// Clear the token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the full URL for a backend endpoint
    pub fn api_url(&self, path: &str) -> String {
        self.app.endpoint(path)
    }

    pub fn anon_key(&self) -> &str {
        &self.app.anon_key
    }

    /// Bearer credential: the session token, or the anon key before login
    pub fn bearer(&self) -> &str {
        self.token.as_deref().unwrap_or(&self.app.anon_key)
    }
}
