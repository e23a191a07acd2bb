//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層とセッションレジストリを操作します。

pub mod broadcast;
pub mod connect_session;
pub mod disconnect_session;
pub mod dispatch;
pub mod error;
pub mod update_position;

pub use broadcast::{BroadcastNotifier, BroadcastTrigger, BroadcastUseCase, Broadcaster};
pub use connect_session::{ConnectSessionUseCase, OpenedSession, ProfileSource};
pub use disconnect_session::DisconnectSessionUseCase;
pub use dispatch::{EventHandler, EventRouter};
pub use error::{BroadcastError, ConnectError, DispatchError, HandlerError};
pub use update_position::UpdatePositionUseCase;
