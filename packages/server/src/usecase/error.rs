//! UseCase 層のエラー定義

use thiserror::Error;

use crate::{
    domain::{KinematicsError, SessionId},
    infrastructure::registry::RegistryError,
};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// イベントハンドラのエラー（接続は維持される）
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Rejected movement: {0}")]
    Kinematics(#[from] KinematicsError),

    #[error("Session '{0}' is not active")]
    SessionNotActive(SessionId),
}

/// イベント振り分けのエラー（接続は維持される）
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No handler for event type '{0}'")]
    UnknownEventType(String),

    #[error("Handler for '{event_type}' failed: {source}")]
    Handler {
        event_type: String,
        #[source]
        source: HandlerError,
    },
}

/// ブロードキャストのエラー
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Failed to encode broadcast: {0}")]
    Encode(#[from] serde_json::Error),
}
