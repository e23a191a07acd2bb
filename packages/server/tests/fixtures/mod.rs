//! Test fixtures for integration tests.
//!
//! Starts the server in-process on an ephemeral port so tests can run in
//! parallel without port collisions.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use cursorhub_server::{
    ServerConfig,
    domain::{ProfileStore, Username},
    infrastructure::repository::InMemoryProfileStore,
    ui::state::AppState,
};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Server running on 127.0.0.1 with an OS-assigned port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub store: Arc<InMemoryProfileStore>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let store = Arc::new(InMemoryProfileStore::new());
        let dyn_store: Arc<dyn ProfileStore> = store.clone();
        let (state, broadcaster) = AppState::new(dyn_store, &config);
        broadcaster.spawn();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = cursorhub_server::serve(listener, server_state, shutdown).await {
                eprintln!("Test server error: {e}");
            }
        });

        Self {
            addr,
            state,
            store,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, username: &str) -> String {
        format!("ws://{}/ws?username={}", self.addr, username)
    }

    /// Connect a WebSocket client and wait until the server has registered
    /// and recorded it.
    pub async fn connect(&self, username: &str) -> WsClient {
        let before = self.state.registry.count().await;
        let (ws, _) = connect_async(self.ws_url(username))
            .await
            .expect("Failed to connect WebSocket");
        self.wait_for_sessions(before + 1).await;
        self.wait_for_active_record(username).await;
        ws
    }

    /// Poll the store until `username` has an active session record.
    pub async fn wait_for_active_record(&self, username: &str) {
        let store = self.store.clone();
        let username = Username::new(username.to_string()).expect("Invalid username");
        tokio::time::timeout(Duration::from_secs(5), async move {
            loop {
                if let Ok(Some(record)) = store.latest_session(&username).await
                    && record.is_active
                {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session record was not created");
    }

    /// Poll the registry until it holds `expected` sessions.
    pub async fn wait_for_sessions(&self, expected: usize) {
        let registry = self.state.registry.clone();
        tokio::time::timeout(Duration::from_secs(5), async move {
            while registry.count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry did not reach {expected} session(s)"));
    }

    /// Stop the server and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub async fn send_update(ws: &mut WsClient, x: f64, y: f64, delta: f64) {
    let frame = serde_json::json!({
        "type": "update_position",
        "payload": {"x": x, "y": y, "delta": delta},
    });
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("Failed to send update");
}

/// Next text frame parsed as JSON, skipping control frames.
pub async fn next_json(ws: &mut WsClient) -> serde_json::Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).expect("Server sent invalid JSON");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => panic!("Unexpected frame: {other:?}"),
            }
        }
    })
    .await
    .expect("Timed out waiting for a frame")
}

/// Read broadcasts until one satisfies `pred`.
pub async fn next_broadcast_matching<F>(ws: &mut WsClient, mut pred: F) -> serde_json::Value
where
    F: FnMut(&serde_json::Map<String, serde_json::Value>) -> bool,
{
    loop {
        let event = next_json(ws).await;
        assert_eq!(event["type"], "broadcast");
        if let Some(payload) = event["payload"].as_object()
            && pred(payload)
        {
            return event;
        }
    }
}
