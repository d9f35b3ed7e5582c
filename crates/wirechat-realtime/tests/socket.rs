//! Live-socket exercises against an in-process WebSocket server: status
//! fan-out, acknowledged emit, push dispatch, and reconnection give-up.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use chrono::Utc;
use serde_json::{Value, json};

use wirechat_auth::credentials::CredentialPair;
use wirechat_auth::store::{CredentialStore, MemoryCredentialStore};
use wirechat_core::config::RealtimeConfig;
use wirechat_core::error::ErrorKind;
use wirechat_realtime::{ConnectionStatus, SocketManager};

async fn ws_handler(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(mut socket: WebSocket) {
    let greeting = json!({ "event": "greeting", "data": { "hello": true } });
    if socket
        .send(Message::Text(greeting.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else {
            continue;
        };
        let Some(id) = frame.get("id").and_then(Value::as_u64) else {
            continue;
        };
        let response = if frame["event"] == "fail-me" {
            json!({ "ack": id, "success": false, "error": "boom" })
        } else {
            json!({ "ack": id, "success": true, "data": { "echoed": frame["event"] } })
        };
        if socket
            .send(Message::Text(response.to_string().into()))
            .await
            .is_err()
        {
            return;
        }
    }
}

async fn spawn_server() -> String {
    let app = axum::Router::new().route("/ws", get(ws_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("ws://{addr}/ws")
}

fn store_with_token() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with_pair(CredentialPair {
        access_token: "live-access".to_string(),
        refresh_token: "live-refresh".to_string(),
        expires_at: Utc::now() + chrono::Duration::minutes(15),
    }))
}

fn manager(url: String, store: Arc<MemoryCredentialStore>) -> SocketManager {
    let config = RealtimeConfig {
        url,
        connect_timeout_seconds: 5,
        reconnect_base_delay_ms: 50,
        reconnect_max_delay_ms: 200,
        max_reconnect_attempts: 3,
    };
    SocketManager::new(config, store as Arc<dyn CredentialStore>)
}

async fn wait_for(manager: &SocketManager, status: ConnectionStatus) {
    for _ in 0..100 {
        if manager.status() == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "status never reached {status}, still {}",
        manager.status()
    );
}

#[tokio::test]
async fn test_status_sequence_reaches_both_subscribers() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());

    let seen_a: Arc<Mutex<Vec<ConnectionStatus>>> = Arc::default();
    let seen_b: Arc<Mutex<Vec<ConnectionStatus>>> = Arc::default();
    let sink = Arc::clone(&seen_a);
    manager.on_status(move |status| sink.lock().expect("lock").push(status));
    let sink = Arc::clone(&seen_b);
    manager.on_status(move |status| sink.lock().expect("lock").push(status));

    manager.connect();
    wait_for(&manager, ConnectionStatus::Connected).await;

    let expected = vec![ConnectionStatus::Connecting, ConnectionStatus::Connected];
    assert_eq!(*seen_a.lock().expect("lock"), expected);
    assert_eq!(*seen_b.lock().expect("lock"), expected);
}

#[tokio::test]
async fn test_connect_is_a_noop_when_connected() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());

    manager.connect();
    wait_for(&manager, ConnectionStatus::Connected).await;

    let transitions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&transitions);
    manager.on_status(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    manager.connect();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(transitions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_connect_without_credentials_aborts() {
    let url = spawn_server().await;
    let manager = manager(url, Arc::new(MemoryCredentialStore::new()));

    manager.connect();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(manager.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_emit_resolves_with_ack_payload() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());
    manager.connect();
    wait_for(&manager, ConnectionStatus::Connected).await;

    let response = manager
        .emit("message:send", json!({ "content": "hi" }))
        .await
        .expect("acknowledged");
    assert_eq!(response["echoed"], "message:send");
}

#[tokio::test]
async fn test_emit_surfaces_remote_failure_message() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());
    manager.connect();
    wait_for(&manager, ConnectionStatus::Connected).await;

    let err = manager
        .emit("fail-me", Value::Null)
        .await
        .expect_err("remote failure");
    assert_eq!(err.kind, ErrorKind::Realtime);
    assert!(err.message.contains("boom"));
}

#[tokio::test]
async fn test_emit_rejects_immediately_when_not_connected() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());

    let err = manager
        .emit("message:send", Value::Null)
        .await
        .expect_err("not connected");
    assert_eq!(err.kind, ErrorKind::Realtime);
}

#[tokio::test]
async fn test_push_events_dispatch_to_subscribers() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());

    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = Arc::clone(&seen);
    manager.on("greeting", move |data| {
        sink.lock().expect("lock").push(data.clone());
    });

    manager.connect();
    wait_for(&manager, ConnectionStatus::Connected).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["hello"], true);
}

#[tokio::test]
async fn test_unreachable_server_settles_in_error() {
    // Nothing listens on this port; three fast attempts then give up.
    let manager = manager("ws://127.0.0.1:9/ws".to_string(), store_with_token());

    let errors = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&errors);
    manager.on_error(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    manager.connect();
    wait_for(&manager, ConnectionStatus::Error).await;
    // Let any further (incorrect) retries play out.
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(manager.status(), ConnectionStatus::Error);
    assert_eq!(errors.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_auth_binding_drives_connect_and_disconnect() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());
    let (auth_tx, auth_rx) = tokio::sync::watch::channel(true);

    let _binding = wirechat_realtime::bind_auth_state(manager.clone(), auth_rx);
    wait_for(&manager, ConnectionStatus::Connected).await;

    auth_tx.send(false).expect("send");
    wait_for(&manager, ConnectionStatus::Disconnected).await;
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let url = spawn_server().await;
    let manager = manager(url, store_with_token());
    manager.connect();
    wait_for(&manager, ConnectionStatus::Connected).await;

    manager.disconnect();
    assert_eq!(manager.status(), ConnectionStatus::Disconnected);
    manager.disconnect();
    assert_eq!(manager.status(), ConnectionStatus::Disconnected);
}
