//! Core domain models for cursor synchronization.

use serde::{Deserialize, Serialize};

use super::value_object::{Position, SessionId, Timestamp, Username};

/// Rate of change of a position, in position units per `delta` unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// Motion state of one connected client.
///
/// `position` is the last position acknowledged from the client; every other
/// field is derived from successive positions by `kinematics::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientState {
    pub position: Position,
    pub velocity: Velocity,
    /// Always non-negative
    pub speed: f64,
    /// Radians, `atan2(dy, dx)` of the last movement
    pub heading: f64,
    pub acceleration: f64,
}

impl ClientState {
    /// State of a client that has not reported any movement yet.
    pub fn at_rest() -> Self {
        Self::default()
    }
}

/// User profile kept by the external store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: Username,
    pub color: String,
    pub mood: String,
}

impl Profile {
    pub fn new(username: Username, color: String, mood: String) -> Self {
        Self {
            username,
            color,
            mood,
        }
    }

    /// Profile used when the store could not provide one.
    pub fn empty(username: Username) -> Self {
        Self::new(username, String::new(), String::new())
    }

    /// Overwrite the fields that are present and non-empty.
    pub fn apply_update(&mut self, color: Option<String>, mood: Option<String>) {
        if let Some(color) = color.filter(|c| !c.is_empty()) {
            self.color = color;
        }
        if let Some(mood) = mood.filter(|m| !m.is_empty()) {
            self.mood = mood;
        }
    }
}

/// Persisted trace of one connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub username: Username,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl SessionRecord {
    /// Create a record for a connection that has just been accepted.
    pub fn opened(id: SessionId, username: Username, created_at: Timestamp) -> Self {
        Self {
            id,
            username,
            is_active: true,
            created_at,
        }
    }
}
