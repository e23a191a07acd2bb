//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::{
    domain::{ClientSession, SessionId, Username},
    infrastructure::{
        dto::websocket::EventEnvelope,
        registry::{OutboundReceiver, outbound_channel},
    },
    ui::state::{AppState, ConnectQuery},
    usecase::EventRouter,
};

/// How long the send loop may take to flush and close after the peer left
const SEND_LOOP_GRACE: Duration = Duration::from_secs(5);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> Username (Domain Model)
    let username = match Username::try_from(query.username.clone()) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!("Invalid username '{}': {}", query.username, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, username)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, username: Username) {
    let connect_usecase = state.connect_usecase();
    let opened = connect_usecase.open_session(username).await;
    let (tx, rx) = outbound_channel(state.outbound_capacity);

    if let Err(e) = connect_usecase.execute(&opened, tx).await {
        tracing::error!("Failed to register session '{}': {}", opened.session.id(), e);
        return;
    }

    let session = opened.session;
    let session_id = session.id();
    let (sender, receiver) = socket.split();

    let mut send_task = tokio::spawn(send_loop(sender, rx, session_id));
    let mut recv_task = tokio::spawn(recv_loop(receiver, state.router.clone(), session));

    let disconnect_usecase = state.disconnect_usecase();
    tokio::select! {
        _ = &mut recv_task => {
            // Deregistering closes the queue; the send loop then sends the close frame.
            disconnect_usecase.execute(&session_id).await;
            if tokio::time::timeout(SEND_LOOP_GRACE, &mut send_task).await.is_err() {
                tracing::warn!("Send loop of '{}' did not finish in time", session_id);
                send_task.abort();
            }
        }
        _ = &mut send_task => {
            recv_task.abort();
            disconnect_usecase.execute(&session_id).await;
        }
    };
}

/// Read frames from the client until the transport closes.
async fn recv_loop(mut receiver: SplitStream<WebSocket>, router: Arc<EventRouter>, session: Arc<ClientSession>) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", session.id(), e);
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_text(&router, &session, text.as_str()).await,
            Message::Binary(_) => {
                tracing::warn!("Ignoring binary frame from '{}'", session.id());
            }
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", session.id());
                break;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}

async fn handle_text(router: &EventRouter, session: &ClientSession, text: &str) {
    let event = match EventEnvelope::parse(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", session.id(), e);
            return;
        }
    };

    if let Err(e) = router.dispatch(&event, session).await {
        tracing::warn!("Event from '{}' rejected: {}", session.id(), e);
    }
}

/// Write queued frames to the client until the queue is closed.
async fn send_loop(mut sender: SplitSink<WebSocket, Message>, mut rx: OutboundReceiver, session_id: SessionId) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = sender.send(Message::Text(frame.to_string().into())).await {
            tracing::warn!("Failed to write to '{}': {}", session_id, e);
        }
    }

    if let Err(e) = sender.send(Message::Close(None)).await {
        tracing::debug!("Failed to send close frame to '{}': {}", session_id, e);
    }
    tracing::debug!("Send loop of '{}' finished", session_id);
}
