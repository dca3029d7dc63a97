/**
 * REST Backend Client
 *
 * Talks to the managed backend over HTTP: the PostgREST table for messages,
 * the auth service for login and profile updates, and object storage for
 * avatars. Calls are blocking; each one drives the shared tokio runtime with
 * `block_on` and is meant to run on a worker thread.
 */
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::{Arc, RwLock};
use std::sync::mpsc;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use super::realtime::{self, RealtimeParams};
use super::{AccountBackend, ChatBackend, PageQuery, Subscription};
use crate::egui_app::config::Config;
use crate::shared::{ChatError, Message, NewMessage, ProfileUpdate, Session, SessionUser};

/// HTTP implementation of the backend traits
pub struct RestBackend {
    config: RwLock<Config>,
    client: Client,
    runtime: Arc<Runtime>,
}

impl RestBackend {
    pub fn new(config: Config) -> Result<Self, ChatError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("roomchat-net")
            .enable_all()
            .build()?;
        // Stalled requests end as network errors
        let timeout = config.app().request_timeout();
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            config: RwLock::new(config),
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Install or clear the session access token
    pub fn set_session_token(&self, token: Option<String>) {
        self.config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .set_token(token);
    }

    fn authorized(&self, config: &Config, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", config.anon_key())
            .header("Authorization", format!("Bearer {}", config.bearer()))
    }

    fn table_url(config: &Config) -> String {
        config.api_url(&format!("/rest/v1/{}", config.app().table))
    }
}

/// Turn a non-success response into a `ChatError::Backend`
async fn check(response: Response) -> Result<Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ChatError::backend(status.as_u16(), error_message(status, &body)))
}

/// Extract the human-readable message from a backend error body.
///
/// The table API uses `message`, the auth service `msg` or
/// `error_description`, storage `error`. Falls back to the raw body, then
/// the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|m| !m.trim().is_empty());

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.canonical_reason().unwrap_or("request failed").to_string(),
    }
}

impl ChatBackend for RestBackend {
    fn select_page(&self, query: PageQuery) -> Result<Vec<Message>, ChatError> {
        let config = self.config();
        let url = Self::table_url(&config);
        tracing::debug!(
            "Fetching page: order={}, offset={}, limit={}",
            query.order.as_str(),
            query.offset,
            query.limit
        );

        self.runtime.block_on(async {
            let request = self.client.get(&url).query(&[
                ("select", "*".to_string()),
                ("order", format!("id.{}", query.order.as_str())),
                ("offset", query.offset.to_string()),
                ("limit", query.limit.to_string()),
            ]);
            let response = self.authorized(&config, request).send().await?;
            let messages: Vec<Message> = check(response).await?.json().await?;
            Ok::<_, ChatError>(messages)
        })
    }

    fn append(&self, message: &NewMessage) -> Result<(), ChatError> {
        let config = self.config();
        let url = Self::table_url(&config);

        self.runtime.block_on(async {
            let request = self
                .client
                .post(&url)
                .header("Prefer", "return=minimal")
                .json(&[message]);
            let response = self.authorized(&config, request).send().await?;
            check(response).await?;
            Ok::<_, ChatError>(())
        })
    }

    fn subscribe(&self, topic: &str) -> Result<Subscription, ChatError> {
        let config = self.config();
        let params = RealtimeParams::new(config.app(), topic, config.bearer())?;

        let (event_tx, event_rx) = mpsc::channel();
        let (status_tx, status_rx) = mpsc::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        tracing::info!("Subscribing to realtime topic '{}'", topic);
        self.runtime
            .spawn(realtime::run(params, event_tx, status_tx, cancel_rx));

        Ok(Subscription::new(topic, event_rx, move || {
            let _ = cancel_tx.send(());
        })
        .with_status(status_rx))
    }
}

impl AccountBackend for RestBackend {
    fn request_login_code(&self, email: &str) -> Result<(), ChatError> {
        let config = self.config();
        let url = config.api_url("/auth/v1/otp");

        self.runtime.block_on(async {
            let request = self.client.post(&url).json(&serde_json::json!({
                "email": email,
                "create_user": true,
            }));
            let response = self.authorized(&config, request).send().await?;
            check(response).await?;
            Ok::<_, ChatError>(())
        })
    }

    fn verify_login_code(&self, email: &str, code: &str) -> Result<Session, ChatError> {
        let config = self.config();
        let url = config.api_url("/auth/v1/verify");

        let session: Session = self.runtime.block_on(async {
            let request = self.client.post(&url).json(&serde_json::json!({
                "type": "email",
                "email": email,
                "token": code,
            }));
            let response = self.authorized(&config, request).send().await?;
            let session: Session = check(response).await?.json().await?;
            Ok::<_, ChatError>(session)
        })?;

        self.set_session_token(Some(session.access_token.clone()));
        Ok(session)
    }

    fn sign_out(&self) -> Result<(), ChatError> {
        let config = self.config();
        if config.get_token().is_none() {
            return Ok(());
        }
        let url = config.api_url("/auth/v1/logout");

        let result = self.runtime.block_on(async {
            let request = self.client.post(&url);
            let response = self.authorized(&config, request).send().await?;
            check(response).await?;
            Ok::<_, ChatError>(())
        });

        // The local session ends whatever the backend said
        self.set_session_token(None);
        result
    }

    fn upload_avatar(&self, file_name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ChatError> {
        let config = self.config();
        if config.get_token().is_none() {
            return Err(ChatError::NotAuthenticated);
        }
        let bucket = &config.app().avatar_bucket;
        let url = config.api_url(&format!("/storage/v1/object/{}/{}", bucket, file_name));

        self.runtime.block_on(async {
            let request = self
                .client
                .post(&url)
                .header("Content-Type", content_type)
                .header("x-upsert", "true")
                .body(bytes);
            let response = self.authorized(&config, request).send().await?;
            check(response).await?;
            Ok::<_, ChatError>(())
        })?;

        Ok(config.api_url(&format!("/storage/v1/object/public/{}/{}", bucket, file_name)))
    }

    fn update_profile(&self, update: &ProfileUpdate) -> Result<SessionUser, ChatError> {
        let config = self.config();
        if config.get_token().is_none() {
            return Err(ChatError::NotAuthenticated);
        }
        let url = config.api_url("/auth/v1/user");

        self.runtime.block_on(async {
            let request = self.client.put(&url).json(&serde_json::json!({
                "data": {
                    "name": update.name,
                    "avatar_url": update.avatar_url,
                }
            }));
            let response = self.authorized(&config, request).send().await?;
            let user: SessionUser = check(response).await?.json().await?;
            Ok::<_, ChatError>(user)
        })
    }
}
