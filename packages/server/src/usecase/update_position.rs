//! UseCase: 位置の更新
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdatePositionUseCase::execute() と EventHandler としての handle()
//! - 運動量（速度・速さ・向き・加速度）の更新とブロードキャスト要求
//!
//! ### どのような状況を想定しているか
//! - 正常系：原点からの移動、同じ位置の連続報告
//! - 異常系：delta=0、ペイロードの形式不正、非アクティブなセッション

use async_trait::async_trait;

use crate::{
    domain::{ClientSession, ClientState, Position},
    infrastructure::dto::websocket::{EventEnvelope, UpdatePositionPayload},
};

use super::{broadcast::BroadcastNotifier, dispatch::EventHandler, error::HandlerError};

/// 位置更新のユースケース
pub struct UpdatePositionUseCase {
    notifier: BroadcastNotifier,
}

impl UpdatePositionUseCase {
    /// 新しい UpdatePositionUseCase を作成
    pub fn new(notifier: BroadcastNotifier) -> Self {
        Self { notifier }
    }

    /// 位置更新を実行
    ///
    /// 成功した場合は状態が変わらなくても必ずブロードキャストを要求する。
    ///
    /// # Returns
    ///
    /// * `Ok(ClientState)` - 更新後の状態
    /// * `Err(HandlerError)` - 更新を拒否（状態は変わらない）
    pub async fn execute(
        &self,
        session: &ClientSession,
        payload: UpdatePositionPayload,
    ) -> Result<ClientState, HandlerError> {
        if !session.is_active().await {
            return Err(HandlerError::SessionNotActive(session.id()));
        }

        let state = session
            .advance(Position::new(payload.x, payload.y), payload.delta)
            .await?;
        tracing::debug!(
            "Update: {} -> x {} y {} (spd {:.4}, ang {:.4})",
            session.username(),
            state.position.x,
            state.position.y,
            state.speed,
            state.heading
        );

        self.notifier.notify(session.id());
        Ok(state)
    }
}

#[async_trait]
impl EventHandler for UpdatePositionUseCase {
    async fn handle(&self, event: &EventEnvelope, session: &ClientSession) -> Result<(), HandlerError> {
        let payload: UpdatePositionPayload = event.decode_payload()?;
        self.execute(session, payload).await.map(|_| ())
    }
}
