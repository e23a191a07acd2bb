//! Registry of active sessions.
//!
//! Lock discipline: membership changes (`register`, `deregister`) take the
//! write lock; snapshots and fan-out take the read lock and hold it for the
//! whole iteration, so the recipients of a broadcast are exactly the sessions
//! it describes.
//!
//! The sending half of each session's outbound queue lives only in its
//! registry entry. Removing the entry drops the sender, which closes the
//! queue and lets the session's send loop finish.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::{
    RwLock,
    mpsc::{self, error::TrySendError},
};

use crate::domain::{ClientSession, ClientState, SessionId, Username};

/// Serialized frames waiting to be written to one client
pub type OutboundSender = mpsc::Sender<Arc<str>>;
pub type OutboundReceiver = mpsc::Receiver<Arc<str>>;

/// Create a bounded outbound queue.
pub fn outbound_channel(capacity: usize) -> (OutboundSender, OutboundReceiver) {
    mpsc::channel(capacity)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Session '{0}' is already registered")]
    DuplicateSessionId(SessionId),

    #[error("Session '{0}' is already closing")]
    SessionClosing(SessionId),
}

/// Public state of one session at the time of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub username: Username,
    pub state: ClientState,
}

/// Outcome of enqueuing one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    /// Sessions registered when the snapshot was taken
    pub recipients: usize,
    pub delivered: usize,
    /// Queue full: the client is not keeping up
    pub dropped: usize,
    /// Queue closed: the send loop has already ended
    pub closed: usize,
}

struct RegisteredSession {
    session: Arc<ClientSession>,
    outbound: OutboundSender,
}

/// Set of currently active sessions
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, RegisteredSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session and mark it `Active`.
    pub async fn register(
        &self,
        session: Arc<ClientSession>,
        outbound: OutboundSender,
    ) -> Result<(), RegistryError> {
        let id = session.id();
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(RegistryError::DuplicateSessionId(id));
        }
        if !session.activate().await {
            return Err(RegistryError::SessionClosing(id));
        }
        sessions.insert(id, RegisteredSession { session, outbound });
        tracing::debug!("Registered session '{}' ({} active)", id, sessions.len());
        Ok(())
    }

    /// Remove a session, closing its outbound queue.
    ///
    /// Returns the removed session, or `None` if it was not registered
    /// (including when it was already deregistered).
    pub async fn deregister(&self, id: &SessionId) -> Option<Arc<ClientSession>> {
        let mut sessions = self.sessions.write().await;
        let RegisteredSession { session, outbound } = sessions.remove(id)?;
        session.begin_close().await;
        drop(outbound);
        tracing::debug!("Deregistered session '{}' ({} active)", id, sessions.len());
        Some(session)
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<ClientSession>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|r| r.session.clone())
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Public state of every registered session.
    pub async fn snapshot(&self) -> Vec<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        Self::collect(&sessions).await
    }

    /// Snapshot all sessions, encode the snapshot once and enqueue the result
    /// on every registered session's outbound queue.
    ///
    /// Never waits on a queue: a full queue drops this message for that
    /// session only.
    pub async fn fan_out<F, E>(&self, encode: F) -> Result<FanOutReport, E>
    where
        F: FnOnce(&[SessionSnapshot]) -> Result<String, E>,
    {
        let sessions = self.sessions.read().await;
        let snapshot = Self::collect(&sessions).await;
        let message: Arc<str> = Arc::from(encode(&snapshot)?);

        let mut report = FanOutReport {
            recipients: sessions.len(),
            ..FanOutReport::default()
        };
        for (id, registered) in sessions.iter() {
            match registered.outbound.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Outbound queue of session '{}' is full, dropping broadcast", id);
                    report.dropped += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Outbound queue of session '{}' is closed", id);
                    report.closed += 1;
                }
            }
        }
        Ok(report)
    }

    async fn collect(sessions: &HashMap<SessionId, RegisteredSession>) -> Vec<SessionSnapshot> {
        let mut snapshot = Vec::with_capacity(sessions.len());
        for (id, registered) in sessions.iter() {
            snapshot.push(SessionSnapshot {
                id: *id,
                username: registered.session.username().clone(),
                state: registered.session.state().await,
            });
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, Profile, SessionIdFactory, SessionLifecycle, Timestamp};
    use std::collections::HashSet;

    fn new_session(name: &str) -> Arc<ClientSession> {
        let profile = Profile::empty(Username::new(name.to_string()).unwrap());
        Arc::new(ClientSession::new(
            SessionIdFactory::generate(),
            profile,
            Timestamp::new(0),
        ))
    }

    fn encode_ids(snapshot: &[SessionSnapshot]) -> Result<String, std::convert::Infallible> {
        let mut ids: Vec<String> = snapshot.iter().map(|s| s.id.to_string()).collect();
        ids.sort();
        Ok(ids.join(","))
    }

    #[tokio::test]
    async fn test_register_activates_session() {
        // テスト項目: 登録したセッションはアクティブになり、件数に含まれる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let session = new_session("alice");
        let (tx, _rx) = outbound_channel(4);

        // when (操作):
        let result = registry.register(session.clone(), tx).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.count().await, 1);
        assert!(registry.contains(&session.id()).await);
        assert_eq!(session.lifecycle().await, SessionLifecycle::Active);
    }

    #[tokio::test]
    async fn test_register_duplicate_id_fails() {
        // テスト項目: 同じ ID のセッションは二重に登録できない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let session = new_session("alice");
        let (tx1, _rx1) = outbound_channel(4);
        let (tx2, _rx2) = outbound_channel(4);
        registry.register(session.clone(), tx1).await.unwrap();

        // when (操作):
        let result = registry.register(session.clone(), tx2).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::DuplicateSessionId(session.id())));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_register_closing_session_fails() {
        // テスト項目: 終了処理に入ったセッションは登録できない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let session = new_session("alice");
        session.begin_close().await;
        let (tx, _rx) = outbound_channel(4);

        // when (操作):
        let result = registry.register(session.clone(), tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::SessionClosing(session.id())));
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_deregister_closes_outbound_queue() {
        // テスト項目: 登録解除で送信キューが閉じられる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let session = new_session("alice");
        let (tx, mut rx) = outbound_channel(4);
        registry.register(session.clone(), tx).await.unwrap();

        // when (操作):
        let removed = registry.deregister(&session.id()).await;

        // then (期待する結果):
        assert!(removed.is_some());
        assert_eq!(rx.recv().await, None);
        assert_eq!(session.lifecycle().await, SessionLifecycle::Closing);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_deregister_is_idempotent() {
        // テスト項目: 二回目の登録解除は何もしない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let session = new_session("alice");
        let (tx, _rx) = outbound_channel(4);
        registry.register(session.clone(), tx).await.unwrap();
        registry.deregister(&session.id()).await;

        // when (操作):
        let second = registry.deregister(&session.id()).await;

        // then (期待する結果):
        assert!(second.is_none());
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_fan_out_reaches_every_session() {
        // テスト項目: 全セッションに同じスナップショットが届く
        // given (前提条件):
        let registry = SessionRegistry::new();
        let alice = new_session("alice");
        let bob = new_session("bob");
        let (tx_a, mut rx_a) = outbound_channel(4);
        let (tx_b, mut rx_b) = outbound_channel(4);
        registry.register(alice.clone(), tx_a).await.unwrap();
        registry.register(bob.clone(), tx_b).await.unwrap();

        // when (操作):
        let report = registry.fan_out(encode_ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            report,
            FanOutReport {
                recipients: 2,
                delivered: 2,
                dropped: 0,
                closed: 0
            }
        );
        let a = rx_a.recv().await.unwrap();
        let b = rx_b.recv().await.unwrap();
        assert_eq!(a, b);
        assert!(a.contains(&alice.id().to_string()));
        assert!(a.contains(&bob.id().to_string()));
    }

    #[tokio::test]
    async fn test_fan_out_excludes_deregistered_session() {
        // テスト項目: 登録解除後のブロードキャストにはそのセッションが含まれない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let alice = new_session("alice");
        let bob = new_session("bob");
        let (tx_a, mut rx_a) = outbound_channel(4);
        let (tx_b, _rx_b) = outbound_channel(4);
        registry.register(alice.clone(), tx_a).await.unwrap();
        registry.register(bob.clone(), tx_b).await.unwrap();
        registry.deregister(&bob.id()).await;

        // when (操作):
        let report = registry.fan_out(encode_ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.recipients, 1);
        let message = rx_a.recv().await.unwrap();
        assert_eq!(&*message, alice.id().to_string());
    }

    #[tokio::test]
    async fn test_fan_out_drops_when_queue_is_full() {
        // テスト項目: 送信キューが満杯のクライアントには配信せず、他のクライアントは待たされない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let slow = new_session("slow");
        let fast = new_session("fast");
        let (tx_slow, mut rx_slow) = outbound_channel(1);
        let (tx_fast, mut rx_fast) = outbound_channel(4);
        registry.register(slow.clone(), tx_slow).await.unwrap();
        registry.register(fast.clone(), tx_fast).await.unwrap();
        registry.fan_out(encode_ids).await.unwrap();

        // when (操作): slow はまだ 1 件目を読んでいない
        let report = registry.fan_out(encode_ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, 1);
        assert!(rx_fast.recv().await.is_some());
        assert!(rx_fast.recv().await.is_some());
        assert!(rx_slow.recv().await.is_some());
        assert!(rx_slow.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fan_out_counts_closed_queue() {
        // テスト項目: 受信側が閉じたキューは closed として数えられる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let alice = new_session("alice");
        let (tx, rx) = outbound_channel(4);
        registry.register(alice.clone(), tx).await.unwrap();
        drop(rx);

        // when (操作):
        let report = registry.fan_out(encode_ids).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.closed, 1);
        assert_eq!(report.delivered, 0);
    }

    #[tokio::test]
    async fn test_snapshot_reflects_state() {
        // テスト項目: スナップショットには各セッションの最新状態が含まれる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let alice = new_session("alice");
        let (tx, _rx) = outbound_channel(4);
        registry.register(alice.clone(), tx).await.unwrap();
        alice.advance(Position::new(3.0, 4.0), 1.0).await.unwrap();

        // when (操作):
        let snapshot = registry.snapshot().await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, alice.id());
        assert_eq!(snapshot[0].username.as_str(), "alice");
        assert_eq!(snapshot[0].state.position, Position::new(3.0, 4.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_deregister_keeps_registry_consistent() {
        // テスト項目: 並行した登録・解除・ブロードキャストでもレジストリが壊れない
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::new());
        let connects = 64;
        let disconnects = 40;

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..connects {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let session = new_session(&format!("user{i}"));
                let (tx, rx) = outbound_channel(8);
                registry.register(session.clone(), tx).await.unwrap();
                session
                    .advance(Position::new(i as f64, 0.0), 1.0)
                    .await
                    .unwrap();
                registry.fan_out(encode_ids).await.unwrap();
                if i < disconnects {
                    assert!(registry.deregister(&session.id()).await.is_some());
                }
                drop(rx);
                session.id()
            }));
        }
        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(ids.len(), connects);
        assert_eq!(registry.count().await, connects - disconnects);
        let remaining: HashSet<SessionId> = registry.ids().await.into_iter().collect();
        assert_eq!(remaining.len(), connects - disconnects);
        assert!(remaining.is_subset(&ids));
    }
}
