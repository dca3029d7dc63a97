//! Realtime Change Subscription
//!
//! Keeps a websocket open to the backend's realtime service, joins one
//! channel with a `postgres_changes` filter, and forwards every change on
//! that channel as a `ChangeEvent`. The wire format is the Phoenix channel
//! protocol: JSON frames of `{topic, event, payload, ref, join_ref}`.
//!
//! Connection loss is handled here, not by the subscriber: the worker
//! reconnects with exponential backoff and, once re-joined, emits a resync
//! event because changes may have been missed while disconnected.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use url::Url;

use crate::shared::{AppConfig, ChangeEvent, ChatError};

/// Interval between heartbeats on the `phoenix` topic
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);
const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);
const PROTOCOL_VERSION: &str = "1.0.0";

/// Subscription status reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Connecting,
    Connected,
    Retrying,
    Error(String),
    Disconnected,
}

/// One Phoenix channel frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoenixFrame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl PhoenixFrame {
    /// Join `channel`, asking for every change in the `public` schema
    pub fn join(channel: &str, access_token: &str, reference: &str) -> Self {
        Self {
            topic: channel.to_string(),
            event: "phx_join".to_string(),
            payload: serde_json::json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [{ "event": "*", "schema": "public" }]
                },
                "access_token": access_token,
            }),
            reference: Some(reference.to_string()),
            join_ref: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: &str) -> Self {
        Self {
            topic: "phoenix".to_string(),
            event: "heartbeat".to_string(),
            payload: serde_json::json!({}),
            reference: Some(reference.to_string()),
            join_ref: None,
        }
    }

    pub fn leave(channel: &str, reference: &str, join_ref: &str) -> Self {
        Self {
            topic: channel.to_string(),
            event: "phx_leave".to_string(),
            payload: serde_json::json!({}),
            reference: Some(reference.to_string()),
            join_ref: Some(join_ref.to_string()),
        }
    }

    fn to_ws(&self) -> Result<WsMessage, ChatError> {
        Ok(WsMessage::Text(serde_json::to_string(self)?.into()))
    }
}

/// What an incoming frame means for the subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    Change(ChangeEvent),
    Joined,
    JoinFailed(String),
    Closed(String),
    Ignore,
}

/// Interpret a frame received while joined (or joining) `channel`
pub fn classify(frame: &PhoenixFrame, channel: &str, join_ref: &str) -> FrameAction {
    if frame.topic != channel {
        return FrameAction::Ignore;
    }
    let status = frame.payload.get("status").and_then(|s| s.as_str());
    match frame.event.as_str() {
        "postgres_changes" => FrameAction::Change(ChangeEvent::from_postgres_changes(&frame.payload)),
        "phx_reply" if frame.reference.as_deref() == Some(join_ref) => {
            if status == Some("ok") {
                FrameAction::Joined
            } else {
                let reason = frame
                    .payload
                    .pointer("/response/reason")
                    .or_else(|| frame.payload.pointer("/response/message"))
                    .and_then(|r| r.as_str())
                    .unwrap_or("join rejected");
                FrameAction::JoinFailed(reason.to_string())
            }
        }
        "system" if status == Some("error") => {
            let message = frame
                .payload
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("realtime system error");
            FrameAction::JoinFailed(message.to_string())
        }
        "phx_error" => FrameAction::Closed("channel error".to_string()),
        "phx_close" => FrameAction::Closed("channel closed by server".to_string()),
        _ => FrameAction::Ignore,
    }
}

/// Websocket URL of the realtime service for a backend base URL
pub fn socket_url(backend_url: &Url, api_key: &str) -> Result<Url, ChatError> {
    let mut url = backend_url
        .join("realtime/v1/websocket")
        .map_err(|e| ChatError::subscription(format!("invalid realtime URL: {}", e)))?;
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme)
        .map_err(|_| ChatError::subscription(format!("cannot use {} for {}", scheme, backend_url)))?;
    url.query_pairs_mut()
        .clear()
        .append_pair("apikey", api_key)
        .append_pair("vsn", PROTOCOL_VERSION);
    Ok(url)
}

/// Everything the worker needs to (re)connect
#[derive(Debug, Clone)]
pub struct RealtimeParams {
    pub url: Url,
    pub channel: String,
    pub access_token: String,
}

impl RealtimeParams {
    pub fn new(app: &AppConfig, topic: &str, access_token: &str) -> Result<Self, ChatError> {
        Ok(Self {
            url: socket_url(&app.backend_url, &app.anon_key)?,
            channel: format!("realtime:{}", topic),
            access_token: access_token.to_string(),
        })
    }
}

enum Exit {
    Cancelled,
    SubscriberGone,
    ConnectionLost(String),
}

/// Subscription worker. Runs until cancelled or the subscriber goes away.
pub async fn run(
    params: RealtimeParams,
    events: Sender<ChangeEvent>,
    status: Sender<SubscriptionStatus>,
    mut cancel: oneshot::Receiver<()>,
) {
    let mut reconnect_delay = INITIAL_RECONNECT_DELAY;
    let mut joined_before = false;

    loop {
        let _ = status.send(SubscriptionStatus::Connecting);
        let exit = listen(&params, &events, &status, &mut cancel, &mut joined_before, &mut reconnect_delay).await;

        let reason = match exit {
            Ok(Exit::Cancelled) => {
                tracing::info!("Realtime subscription to {} closed", params.channel);
                let _ = status.send(SubscriptionStatus::Disconnected);
                return;
            }
            Ok(Exit::SubscriberGone) => return,
            Ok(Exit::ConnectionLost(reason)) => reason,
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            "Realtime connection for {} lost ({}), retrying in {:?}",
            params.channel,
            reason,
            reconnect_delay
        );
        let _ = status.send(SubscriptionStatus::Error(reason));
        let _ = status.send(SubscriptionStatus::Retrying);

        tokio::select! {
            _ = &mut cancel => {
                let _ = status.send(SubscriptionStatus::Disconnected);
                return;
            }
            _ = tokio::time::sleep(reconnect_delay) => {}
        }
        reconnect_delay = std::cmp::min(reconnect_delay * 2, MAX_RECONNECT_DELAY);
    }
}

async fn listen(
    params: &RealtimeParams,
    events: &Sender<ChangeEvent>,
    status: &Sender<SubscriptionStatus>,
    cancel: &mut oneshot::Receiver<()>,
    joined_before: &mut bool,
    reconnect_delay: &mut Duration,
) -> Result<Exit, ChatError> {
    tracing::info!("Connecting to realtime service for {}", params.channel);
    let (socket, _) = tokio_tungstenite::connect_async(params.url.as_str()).await?;
    let (mut sink, mut stream) = socket.split();

    let mut next_ref: u64 = 1;
    let join_ref = next_ref.to_string();
    sink.send(PhoenixFrame::join(&params.channel, &params.access_token, &join_ref).to_ws()?)
        .await?;

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    // the first tick completes immediately
    heartbeat.tick().await;

    loop {
        tokio::select! {
            _ = &mut *cancel => {
                next_ref += 1;
                let leave = PhoenixFrame::leave(&params.channel, &next_ref.to_string(), &join_ref);
                let _ = sink.send(leave.to_ws()?).await;
                let _ = sink.close().await;
                return Ok(Exit::Cancelled);
            }
            _ = heartbeat.tick() => {
                next_ref += 1;
                sink.send(PhoenixFrame::heartbeat(&next_ref.to_string()).to_ws()?).await?;
            }
            incoming = stream.next() => {
                let text = match incoming {
                    None => return Ok(Exit::ConnectionLost("socket closed".to_string())),
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(WsMessage::Close(_))) => {
                        return Ok(Exit::ConnectionLost("server closed the socket".to_string()))
                    }
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(_)) => continue,
                };

                let frame: PhoenixFrame = match serde_json::from_str(text.as_str()) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!("Ignoring unreadable realtime frame: {}", e);
                        continue;
                    }
                };

                match classify(&frame, &params.channel, &join_ref) {
                    FrameAction::Change(event) => {
                        tracing::debug!("Realtime change on {}: {:?}", params.channel, event.kind);
                        if events.send(event).is_err() {
                            return Ok(Exit::SubscriberGone);
                        }
                    }
                    FrameAction::Joined => {
                        tracing::info!("Joined realtime channel {}", params.channel);
                        let _ = status.send(SubscriptionStatus::Connected);
                        *reconnect_delay = INITIAL_RECONNECT_DELAY;
                        if *joined_before && events.send(ChangeEvent::resync()).is_err() {
                            return Ok(Exit::SubscriberGone);
                        }
                        *joined_before = true;
                    }
                    FrameAction::JoinFailed(reason) | FrameAction::Closed(reason) => {
                        return Ok(Exit::ConnectionLost(reason));
                    }
                    FrameAction::Ignore => {}
                }
            }
        }
    }
}
