//! Repository trait for the profile/session store.
//!
//! The domain layer only defines the interface; implementations live in the
//! infrastructure layer (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{Profile, SessionRecord},
    error::StoreError,
    value_object::{SessionId, Username},
};

/// Store of user profiles and per-connection session records.
///
/// The realtime core only calls `get_profile`, `upsert_profile`,
/// `create_session_record` and `mark_session_inactive`, and treats every
/// error as non-fatal. The remaining methods back the user HTTP API and
/// server startup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile of `username`.
    async fn get_profile(&self, username: &Username) -> Result<Profile, StoreError>;

    /// Insert the profile, replacing any existing profile with the same username.
    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError>;

    /// Record a newly accepted connection.
    async fn create_session_record(&self, record: SessionRecord) -> Result<(), StoreError>;

    /// Mark the record of a closed connection inactive.
    async fn mark_session_inactive(&self, id: &SessionId) -> Result<(), StoreError>;

    /// All profiles, ordered by username.
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Most recently created session record of `username`, if any.
    async fn latest_session(&self, username: &Username) -> Result<Option<SessionRecord>, StoreError>;

    /// Mark every session record inactive. Returns how many were active.
    async fn reset_all_sessions(&self) -> Result<usize, StoreError>;
}
