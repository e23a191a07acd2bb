//! Server state shared by every handler.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    config::ServerConfig,
    domain::ProfileStore,
    infrastructure::SessionRegistry,
    usecase::{BroadcastNotifier, Broadcaster, ConnectSessionUseCase, DisconnectSessionUseCase, EventRouter},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: String,
}

/// Shared application state
pub struct AppState {
    /// 接続中のセッション
    pub registry: Arc<SessionRegistry>,
    /// Repository（プロフィールとセッション記録）
    pub store: Arc<dyn ProfileStore>,
    /// イベントの振り分け表（起動時に固定）
    pub router: Arc<EventRouter>,
    pub notifier: BroadcastNotifier,
    /// 各セッションの送信キューの容量
    pub outbound_capacity: usize,
}

impl AppState {
    /// State and the broadcaster that serves it. The caller spawns the
    /// broadcaster.
    pub fn new(store: Arc<dyn ProfileStore>, config: &ServerConfig) -> (Arc<Self>, Broadcaster) {
        let registry = Arc::new(SessionRegistry::new());
        let (notifier, broadcaster) = Broadcaster::new(registry.clone(), config.broadcast_queue_capacity);
        let state = Self {
            registry,
            store,
            router: Arc::new(EventRouter::new(notifier.clone())),
            notifier,
            outbound_capacity: config.outbound_capacity,
        };
        (Arc::new(state), broadcaster)
    }

    pub fn connect_usecase(&self) -> ConnectSessionUseCase {
        ConnectSessionUseCase::new(self.registry.clone(), self.store.clone())
    }

    pub fn disconnect_usecase(&self) -> DisconnectSessionUseCase {
        DisconnectSessionUseCase::new(self.registry.clone(), self.store.clone(), self.notifier.clone())
    }
}
