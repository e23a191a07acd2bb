//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() と close_all()
//! - レジストリからの削除、Store の記録の非アクティブ化、残りのクライアントへの通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続中セッションの切断
//! - エッジケース：二重の切断（受信ループと送信ループの両方から呼ばれる）
//! - 異常系：Store の障害

use std::sync::Arc;

use crate::{
    domain::{ProfileStore, SessionId},
    infrastructure::SessionRegistry,
};

use super::broadcast::BroadcastNotifier;

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    registry: Arc<SessionRegistry>,
    store: Arc<dyn ProfileStore>,
    notifier: BroadcastNotifier,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(registry: Arc<SessionRegistry>, store: Arc<dyn ProfileStore>, notifier: BroadcastNotifier) -> Self {
        Self {
            registry,
            store,
            notifier,
        }
    }

    /// セッション切断を実行
    ///
    /// 何度呼んでも安全。二回目以降は何もしない。
    ///
    /// # Returns
    ///
    /// このセッションを実際に削除した場合は `true`
    pub async fn execute(&self, id: &SessionId) -> bool {
        // 1. レジストリから削除（送信キューが閉じられる）
        let Some(session) = self.registry.deregister(id).await else {
            return false;
        };

        // 2. Store の記録を非アクティブに（ベストエフォート）
        if let Err(e) = self.store.mark_session_inactive(id).await {
            tracing::warn!("Failed to mark session '{}' inactive: {}", id, e);
        }
        session.finish_close().await;

        tracing::info!(
            "Session '{}' of '{}' disconnected ({} active)",
            id,
            session.username(),
            self.registry.count().await
        );

        // 3. 残りのクライアントに最新の一覧を送る
        self.notifier.notify(*id);
        true
    }

    /// 全てのセッションを切断する（サーバー停止時）
    pub async fn close_all(&self) -> usize {
        let mut closed = 0;
        for id in self.registry.ids().await {
            if self.execute(&id).await {
                closed += 1;
            }
        }
        closed
    }
}
