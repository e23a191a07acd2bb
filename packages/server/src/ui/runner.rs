//! Router construction and server startup.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::ProfileStore,
    error::ServerError,
    infrastructure::repository::InMemoryProfileStore,
    ui::{
        handler::{get_user, health_check, list_users, update_user, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/users", get(list_users))
        .route("/api/users/{username}", get(get_user).patch(update_user))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves, then close every session.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let closing = state.clone();
    let shutdown = async move {
        shutdown.await;
        // Upgraded connections are not tracked by the HTTP server; close them here.
        let closed = closing.disconnect_usecase().close_all().await;
        tracing::info!("Closed {} session(s)", closed);
    };

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the server with the in-memory profile store until Ctrl-C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    config.validate().map_err(ServerError::InvalidConfig)?;

    let store: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    let reset = store.reset_all_sessions().await?;
    if reset > 0 {
        tracing::info!("Reset {} stale session record(s)", reset);
    }

    let (state, broadcaster) = AppState::new(store, &config);
    let broadcaster = broadcaster.spawn();

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let result = serve(listener, state, shutdown_signal()).await;

    broadcaster.abort();
    tracing::info!("Server stopped");
    result
}
