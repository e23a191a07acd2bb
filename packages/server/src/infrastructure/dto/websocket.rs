//! WebSocket message DTOs.
//!
//! Every frame is an [`EventEnvelope`]: a `type` string and a payload whose
//! shape depends only on that type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;

use crate::domain::ClientState;

/// Client -> Server: a new cursor position
pub const UPDATE_POSITION: &str = "update_position";

/// Server -> Client: state of every connected session
pub const BROADCAST: &str = "broadcast";

/// Typed envelope with an opaque payload
#[derive(Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub r#type: String,
    pub payload: Box<RawValue>,
}

impl EventEnvelope {
    /// Build an envelope, serializing `payload` eagerly.
    pub fn new<T: Serialize>(event_type: &str, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            r#type: event_type.to_string(),
            payload: serde_json::value::to_raw_value(payload)?,
        })
    }

    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Decode the payload as `T`.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.payload.get())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Payload of `update_position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdatePositionPayload {
    pub x: f64,
    pub y: f64,
    /// Time elapsed since the previous report
    pub delta: f64,
}

/// Wire form of a client's motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDto {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub spd: f64,
    pub acc: f64,
    pub ang: f64,
}

impl From<ClientState> for StateDto {
    fn from(state: ClientState) -> Self {
        Self {
            x: state.position.x,
            y: state.position.y,
            vx: state.velocity.vx,
            vy: state.velocity.vy,
            spd: state.speed,
            acc: state.acceleration,
            ang: state.heading,
        }
    }
}

/// One session in a broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastEntry {
    pub username: String,
    pub state: StateDto,
}

/// Payload of `broadcast`, keyed by session id
pub type BroadcastPayload = BTreeMap<String, BroadcastEntry>;
