//! InMemory Profile Store 実装
//!
//! ドメイン層が定義する ProfileStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//! プロセスが終了するとプロフィールとセッション記録は失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Profile, ProfileStore, SessionId, SessionRecord, StoreError, Username};

/// セッション記録と、ユーザーごとの最新記録への索引
#[derive(Debug, Default)]
struct SessionTable {
    records: HashMap<SessionId, SessionRecord>,
    /// username -> 最新のセッション ID
    latest: HashMap<String, SessionId>,
}

impl SessionTable {
    fn insert(&mut self, record: SessionRecord) {
        let id = record.id;
        let username = record.username.as_str().to_string();
        // 同じ created_at の場合は後から追加された記録を優先する
        let is_newest = self
            .latest
            .get(&username)
            .and_then(|latest| self.records.get(latest))
            .is_none_or(|latest| record.created_at >= latest.created_at);

        self.records.insert(id, record);
        if is_newest {
            self.latest.insert(username, id);
        }
    }
}

/// インメモリ Profile Store 実装
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    /// username -> プロフィール
    profiles: Mutex<HashMap<String, Profile>>,
    sessions: Mutex<SessionTable>,
}

impl InMemoryProfileStore {
    /// 新しい InMemoryProfileStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, username: &Username) -> Result<Profile, StoreError> {
        let profiles = self.profiles.lock().await;
        profiles
            .get(username.as_str())
            .cloned()
            .ok_or_else(|| StoreError::ProfileNotFound(username.to_string()))
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().await;
        profiles.insert(profile.username.as_str().to_string(), profile);
        Ok(())
    }

    async fn create_session_record(&self, record: SessionRecord) -> Result<(), StoreError> {
        self.sessions.lock().await.insert(record);
        Ok(())
    }

    async fn mark_session_inactive(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().await;
        let record = sessions
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionRecordNotFound(id.to_string()))?;
        record.is_active = false;
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let profiles = self.profiles.lock().await;
        let mut list: Vec<Profile> = profiles.values().cloned().collect();
        list.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(list)
    }

    async fn latest_session(&self, username: &Username) -> Result<Option<SessionRecord>, StoreError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .latest
            .get(username.as_str())
            .and_then(|id| sessions.records.get(id))
            .cloned())
    }

    async fn reset_all_sessions(&self) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.lock().await;
        let mut reset = 0;
        for record in sessions.records.values_mut().filter(|r| r.is_active) {
            record.is_active = false;
            reset += 1;
        }
        Ok(reset)
    }
}
