//! UseCase: 全セッションへのブロードキャスト
//!
//! 位置の更新はその場でブロードキャストせず、[`BroadcastNotifier`] 経由で
//! 有界キューに通知だけを積む。専用タスク [`Broadcaster`] がキューを消費し、
//! レジストリのスナップショットを各セッションの送信キューへ配る。
//! 遅いクライアントがいても、更新を送ってきたクライアントの受信処理は止まらない。

use std::sync::Arc;

use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::{
    domain::SessionId,
    infrastructure::{
        FanOutReport, SessionRegistry, SessionSnapshot,
        dto::websocket::{BROADCAST, BroadcastEntry, BroadcastPayload, EventEnvelope},
    },
};

use super::error::BroadcastError;

/// ブロードキャスト要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastTrigger {
    /// 要求の発生源となったセッション
    pub origin: SessionId,
}

/// ブロードキャスト要求の送信側
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: mpsc::Sender<BroadcastTrigger>,
}

impl BroadcastNotifier {
    /// 容量 `capacity` の要求キューを作成
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BroadcastTrigger>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// ブロードキャストを要求する。待たずに戻る。
    ///
    /// キューが満杯の場合は要求を捨てる。積まれている要求が処理される時点の
    /// スナップショットに、この更新も含まれる。
    pub fn notify(&self, origin: SessionId) -> bool {
        match self.tx.try_send(BroadcastTrigger { origin }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Broadcast queue is full, coalescing request from '{}'", origin);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Broadcaster has stopped, dropping request from '{}'", origin);
                false
            }
        }
    }
}

/// スナップショットを broadcast イベントの JSON に変換
pub fn encode_broadcast(snapshot: &[SessionSnapshot]) -> Result<String, BroadcastError> {
    let payload: BroadcastPayload = snapshot
        .iter()
        .map(|s| {
            (
                s.id.to_string(),
                BroadcastEntry {
                    username: s.username.as_str().to_string(),
                    state: s.state.into(),
                },
            )
        })
        .collect();
    Ok(EventEnvelope::new(BROADCAST, &payload)?.to_json()?)
}

/// ブロードキャスト 1 回分のユースケース
pub struct BroadcastUseCase {
    registry: Arc<SessionRegistry>,
}

impl BroadcastUseCase {
    /// 新しい BroadcastUseCase を作成
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 現在のスナップショットを全セッションの送信キューに積む
    pub async fn execute(&self) -> Result<FanOutReport, BroadcastError> {
        self.registry.fan_out(encode_broadcast).await
    }
}

/// ブロードキャスト要求を順に処理する専用タスク
pub struct Broadcaster {
    usecase: BroadcastUseCase,
    triggers: mpsc::Receiver<BroadcastTrigger>,
}

impl Broadcaster {
    /// Broadcaster と、それに要求を送る BroadcastNotifier を作成
    pub fn new(registry: Arc<SessionRegistry>, queue_capacity: usize) -> (BroadcastNotifier, Self) {
        let (notifier, triggers) = BroadcastNotifier::channel(queue_capacity);
        let broadcaster = Self {
            usecase: BroadcastUseCase::new(registry),
            triggers,
        };
        (notifier, broadcaster)
    }

    /// 全ての BroadcastNotifier が破棄されるまで要求を処理する
    pub async fn run(mut self) {
        while let Some(trigger) = self.triggers.recv().await {
            match self.usecase.execute().await {
                Ok(report) => tracing::debug!(
                    "Broadcast from '{}': {} recipients, {} delivered, {} dropped, {} closed",
                    trigger.origin,
                    report.recipients,
                    report.delivered,
                    report.dropped,
                    report.closed
                ),
                Err(e) => tracing::error!("Broadcast from '{}' failed: {}", trigger.origin, e),
            }
        }
        tracing::info!("Broadcaster stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
