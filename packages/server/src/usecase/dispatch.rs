//! UseCase: イベントの振り分け
//!
//! `type` ごとのハンドラ表は生成時に固定され、実行中に追加・変更されない。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::ClientSession,
    infrastructure::dto::websocket::{EventEnvelope, UPDATE_POSITION},
};

use super::{
    broadcast::BroadcastNotifier,
    error::{DispatchError, HandlerError},
    update_position::UpdatePositionUseCase,
};

/// 1 種類のイベントを処理するハンドラ
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// `event.payload` をデコードして処理する
    async fn handle(&self, event: &EventEnvelope, session: &ClientSession) -> Result<(), HandlerError>;
}

/// イベントの `type` からハンドラを引く表
pub struct EventRouter {
    handlers: HashMap<&'static str, Arc<dyn EventHandler>>,
}

impl EventRouter {
    /// 標準のハンドラ表（`update_position` のみ）で作成
    pub fn new(notifier: BroadcastNotifier) -> Self {
        let update_position: Arc<dyn EventHandler> = Arc::new(UpdatePositionUseCase::new(notifier));
        Self::from_handlers([(UPDATE_POSITION, update_position)])
    }

    fn from_handlers(
        handlers: impl IntoIterator<Item = (&'static str, Arc<dyn EventHandler>)>,
    ) -> Self {
        Self {
            handlers: handlers.into_iter().collect(),
        }
    }

    /// 登録されているイベント種別（ソート済み）
    pub fn event_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// イベントを対応するハンドラに渡す
    ///
    /// # Returns
    ///
    /// * `Err(DispatchError::UnknownEventType)` - 対応するハンドラがない
    /// * `Err(DispatchError::Handler)` - ハンドラが失敗した
    ///
    /// どちらのエラーでも呼び出し側は接続を切らない。
    pub async fn dispatch(&self, event: &EventEnvelope, session: &ClientSession) -> Result<(), DispatchError> {
        let handler = self
            .handlers
            .get(event.r#type.as_str())
            .ok_or_else(|| DispatchError::UnknownEventType(event.r#type.clone()))?;

        handler
            .handle(event, session)
            .await
            .map_err(|source| DispatchError::Handler {
                event_type: event.r#type.clone(),
                source,
            })
    }
}
