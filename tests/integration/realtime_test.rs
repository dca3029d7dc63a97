//! Realtime subscription against a local websocket server

use std::sync::mpsc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use roomchat::egui_app::backend::{ChatBackend, RestBackend, Subscription, SubscriptionStatus};
use roomchat::egui_app::Config;
use roomchat::shared::{AppConfig, ChangeEvent, ChangeKind};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::WebSocketStream;

use crate::common::{eventually, TIMEOUT};

type Socket = WebSocketStream<TcpStream>;

/// What the fake realtime server observed
#[derive(Debug)]
enum Seen {
    Uri(String),
    Frame(Value),
}

fn server_runtime() -> (Runtime, TcpListener, u16) {
    let runtime = Runtime::new().unwrap();
    let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
    let port = listener.local_addr().unwrap().port();
    (runtime, listener, port)
}

fn backend(port: u16) -> RestBackend {
    let config = Config::with_builder(
        AppConfig::builder()
            .backend_url(format!("http://127.0.0.1:{}", port))
            .anon_key("anon-key"),
    )
    .unwrap();
    RestBackend::new(config).unwrap()
}

async fn accept(listener: &TcpListener, seen: &mpsc::Sender<Seen>) -> Socket {
    let (stream, _) = listener.accept().await.unwrap();
    let seen = seen.clone();
    tokio_tungstenite::accept_hdr_async(stream, move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        let _ = seen.send(Seen::Uri(request.uri().to_string()));
        Ok(response)
    })
    .await
    .unwrap()
}

async fn next_frame(socket: &mut Socket) -> Option<Value> {
    while let Some(message) = socket.next().await {
        match message.ok()? {
            WsMessage::Text(text) => return serde_json::from_str(text.as_str()).ok(),
            WsMessage::Close(_) => return None,
            _ => continue,
        }
    }
    None
}

/// Read the join frame and acknowledge it
async fn accept_join(socket: &mut Socket, seen: &mpsc::Sender<Seen>) {
    let join = next_frame(socket).await.unwrap();
    let reply = json!({
        "topic": join["topic"],
        "event": "phx_reply",
        "payload": { "status": "ok", "response": { "postgres_changes": [] } },
        "ref": join["ref"],
        "join_ref": join["ref"],
    });
    let _ = seen.send(Seen::Frame(join));
    socket.send(WsMessage::Text(reply.to_string().into())).await.unwrap();
}

fn wait_for_event(sub: &Subscription) -> Option<ChangeEvent> {
    let mut received = None;
    eventually(|| {
        received = sub.poll_events().into_iter().next();
        received.is_some()
    });
    received
}

fn collect_statuses(sub: &Subscription, until: SubscriptionStatus) -> Vec<SubscriptionStatus> {
    let mut statuses = Vec::new();
    eventually(|| {
        statuses.extend(sub.poll_status());
        statuses.last() == Some(&until)
    });
    statuses
}

#[test]
fn test_join_receive_and_leave() {
    let (runtime, listener, port) = server_runtime();
    let (seen_tx, seen_rx) = mpsc::channel();

    runtime.spawn(async move {
        let mut socket = accept(&listener, &seen_tx).await;
        accept_join(&mut socket, &seen_tx).await;

        let change = json!({
            "topic": "realtime:chat",
            "event": "postgres_changes",
            "payload": { "data": { "type": "INSERT", "table": "chat", "commit_timestamp": "2024-05-01T10:00:00Z" } },
            "ref": null,
        });
        socket.send(WsMessage::Text(change.to_string().into())).await.unwrap();

        while let Some(frame) = next_frame(&mut socket).await {
            let leaving = frame["event"] == "phx_leave";
            let _ = seen_tx.send(Seen::Frame(frame));
            if leaving {
                break;
            }
        }
    });

    let backend = backend(port);
    let mut sub = backend.subscribe("chat").unwrap();
    assert_eq!(sub.topic(), "chat");

    let event = wait_for_event(&sub).expect("no change event received");
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.table.as_deref(), Some("chat"));

    sub.unsubscribe();

    let mut frames = Vec::new();
    let mut uri = None;
    while let Ok(seen) = seen_rx.recv_timeout(TIMEOUT) {
        match seen {
            Seen::Uri(u) => uri = Some(u),
            Seen::Frame(frame) => {
                let leaving = frame["event"] == "phx_leave";
                frames.push(frame);
                if leaving {
                    break;
                }
            }
        }
    }

    let uri = uri.expect("no handshake");
    assert!(uri.starts_with("/realtime/v1/websocket?"), "{}", uri);
    assert!(uri.contains("apikey=anon-key"));
    assert!(uri.contains("vsn=1.0.0"));

    let join = &frames[0];
    assert_eq!(join["event"], "phx_join");
    assert_eq!(join["topic"], "realtime:chat");
    assert_eq!(join["payload"]["access_token"], "anon-key");
    assert_eq!(frames.last().unwrap()["event"], "phx_leave");
}

#[test]
fn test_rejoin_emits_resync() {
    let (runtime, listener, port) = server_runtime();
    let (seen_tx, _seen_rx) = mpsc::channel();

    runtime.spawn(async move {
        // First connection: join, then drop the socket
        let mut socket = accept(&listener, &seen_tx).await;
        accept_join(&mut socket, &seen_tx).await;
        let _ = socket.close(None).await;
        drop(socket);

        let mut socket = accept(&listener, &seen_tx).await;
        accept_join(&mut socket, &seen_tx).await;
        while next_frame(&mut socket).await.is_some() {}
    });

    let backend = backend(port);
    let sub = backend.subscribe("chat").unwrap();

    let statuses = collect_statuses(&sub, SubscriptionStatus::Retrying);
    assert!(statuses.contains(&SubscriptionStatus::Retrying), "{:?}", statuses);

    // The reconnect waits one backoff step before dialing again
    let mut resync = None;
    let deadline = std::time::Instant::now() + TIMEOUT;
    while resync.is_none() && std::time::Instant::now() < deadline {
        resync = sub.poll_events().into_iter().find(|e| *e == ChangeEvent::resync());
        std::thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(resync, Some(ChangeEvent::resync()));
}

#[test]
fn test_unreachable_server_reports_retrying() {
    let (runtime, listener, port) = server_runtime();
    // Free the port so connecting fails
    runtime.block_on(async move { drop(listener) });

    let backend = backend(port);
    let sub = backend.subscribe("chat").unwrap();
    let statuses = collect_statuses(&sub, SubscriptionStatus::Retrying);
    assert_eq!(statuses.last(), Some(&SubscriptionStatus::Retrying));
    assert!(
        statuses.iter().any(|s| matches!(s, SubscriptionStatus::Error(_))),
        "{:?}",
        statuses
    );
    assert!(sub.is_active());
    assert!(sub.poll_events().is_empty());
}
