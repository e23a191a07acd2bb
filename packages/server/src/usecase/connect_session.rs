//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::open_session() と execute()
//! - プロフィールの取得、レジストリへの登録、Store への記録
//!
//! ### なぜこのテストが必要か
//! - Store の障害で接続が拒否されないことを保証する
//! - 初回接続のユーザーにプロフィールが作られることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ユーザー・初回ユーザーの接続
//! - 異常系：Store の障害（取得・保存・記録）

use std::sync::Arc;

use crate::{
    domain::{
        ClientSession, Profile, ProfileFactory, ProfileStore, SessionIdFactory, SessionRecord,
        StoreError, Timestamp, Username,
    },
    infrastructure::{SessionRegistry, registry::OutboundSender},
};

use super::error::ConnectError;

/// プロフィールの出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// Store に保存されていた
    Stored,
    /// 初回接続のため新しく作成した（Store に保存する）
    FirstVisit,
    /// Store から取得できなかった（空のプロフィールを使い、保存しない）
    Unavailable,
}

/// 登録前のセッション
#[derive(Debug)]
pub struct OpenedSession {
    pub session: Arc<ClientSession>,
    pub profile_source: ProfileSource,
}

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    registry: Arc<SessionRegistry>,
    store: Arc<dyn ProfileStore>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(registry: Arc<SessionRegistry>, store: Arc<dyn ProfileStore>) -> Self {
        Self { registry, store }
    }

    /// 新しい ID でセッションを作成する（プロフィールの取得は一度だけ）
    ///
    /// プロフィールの取得に失敗しても接続は拒否しない。
    pub async fn open_session(&self, username: Username) -> OpenedSession {
        let (profile, profile_source) = match self.store.get_profile(&username).await {
            Ok(profile) => (profile, ProfileSource::Stored),
            Err(StoreError::ProfileNotFound(_)) => {
                (ProfileFactory::first_visit(username), ProfileSource::FirstVisit)
            }
            Err(e) => {
                tracing::warn!("Failed to get profile of '{}': {}", username, e);
                (Profile::empty(username), ProfileSource::Unavailable)
            }
        };

        let session = ClientSession::new(SessionIdFactory::generate(), profile, Timestamp::now());
        OpenedSession {
            session: Arc::new(session),
            profile_source,
        }
    }

    /// セッションを登録し、Store に記録する
    ///
    /// # Arguments
    ///
    /// * `opened` - open_session() で作成したセッション
    /// * `outbound` - このセッションの送信キュー
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功（Store への記録の失敗はログのみ）
    /// * `Err(ConnectError)` - 登録失敗
    pub async fn execute(&self, opened: &OpenedSession, outbound: OutboundSender) -> Result<(), ConnectError> {
        let session = &opened.session;

        // 1. レジストリに登録
        self.registry.register(session.clone(), outbound).await?;
        tracing::info!(
            "Session '{}' of '{}' registered ({} active)",
            session.id(),
            session.username(),
            self.registry.count().await
        );

        // 2. Store への記録（ベストエフォート、ロックの外で行う）
        if opened.profile_source == ProfileSource::FirstVisit
            && let Err(e) = self.store.upsert_profile(session.profile().clone()).await
        {
            tracing::warn!("Failed to save profile of '{}': {}", session.username(), e);
        }

        let record = SessionRecord::opened(session.id(), session.username().clone(), session.connected_at());
        if let Err(e) = self.store.create_session_record(record).await {
            tracing::warn!("Failed to create session record '{}': {}", session.id(), e);
        }

        Ok(())
    }
}
