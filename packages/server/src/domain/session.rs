//! A connected client and its lifecycle.

use tokio::sync::Mutex;

use super::{
    entity::{ClientState, Profile},
    error::KinematicsError,
    kinematics,
    value_object::{Position, SessionId, Timestamp, Username},
};

/// Lifecycle of a session.
///
/// ```text
/// Connecting --activate--> Active --begin_close--> Closing --finish_close--> Closed
///      \_____________________begin_close______________^
/// ```
///
/// Only the first `begin_close` succeeds, so the receive and send loops can
/// both ask for teardown without closing the session twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    Connecting,
    Active,
    Closing,
    Closed,
}

impl SessionLifecycle {
    /// `Connecting -> Active`. Returns false for any other starting state.
    pub fn activate(&mut self) -> bool {
        if *self == Self::Connecting {
            *self = Self::Active;
            true
        } else {
            false
        }
    }

    /// `Connecting | Active -> Closing`. Returns false if teardown already started.
    pub fn begin_close(&mut self) -> bool {
        match self {
            Self::Connecting | Self::Active => {
                *self = Self::Closing;
                true
            }
            Self::Closing | Self::Closed => false,
        }
    }

    /// `Closing -> Closed`.
    pub fn finish_close(&mut self) -> bool {
        if *self == Self::Closing {
            *self = Self::Closed;
            true
        } else {
            false
        }
    }
}

/// One logical connected client, owning exactly one duplex connection.
///
/// Identity and profile are fixed at construction; motion state and
/// lifecycle change over the session's life.
#[derive(Debug)]
pub struct ClientSession {
    id: SessionId,
    username: Username,
    profile: Profile,
    connected_at: Timestamp,
    state: Mutex<ClientState>,
    lifecycle: Mutex<SessionLifecycle>,
}

impl ClientSession {
    /// Create a session in the `Connecting` state, at rest at the origin.
    pub fn new(id: SessionId, profile: Profile, connected_at: Timestamp) -> Self {
        Self {
            id,
            username: profile.username.clone(),
            profile,
            connected_at,
            state: Mutex::new(ClientState::at_rest()),
            lifecycle: Mutex::new(SessionLifecycle::Connecting),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    /// Copy of the current motion state.
    pub async fn state(&self) -> ClientState {
        *self.state.lock().await
    }

    /// Move to `curr` after `delta` and return the new state.
    ///
    /// The state is replaced as a whole under its lock; on error it is left
    /// untouched.
    pub async fn advance(&self, curr: Position, delta: f64) -> Result<ClientState, KinematicsError> {
        let mut state = self.state.lock().await;
        let next = kinematics::advance(&state, curr, delta)?;
        *state = next;
        Ok(next)
    }

    pub async fn lifecycle(&self) -> SessionLifecycle {
        *self.lifecycle.lock().await
    }

    pub async fn is_active(&self) -> bool {
        self.lifecycle().await == SessionLifecycle::Active
    }

    pub async fn activate(&self) -> bool {
        self.lifecycle.lock().await.activate()
    }

    pub async fn begin_close(&self) -> bool {
        self.lifecycle.lock().await.begin_close()
    }

    pub async fn finish_close(&self) -> bool {
        self.lifecycle.lock().await.finish_close()
    }
}
