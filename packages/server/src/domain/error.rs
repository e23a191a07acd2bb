//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// SessionId invalid format error (not a valid UUID format)
    #[error("SessionId must be a valid UUID format (got: {0})")]
    SessionIdInvalidFormat(String),
}

/// Errors raised when a position report cannot be turned into motion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KinematicsError {
    /// Elapsed time must be strictly positive
    #[error("delta must be a positive finite number (got {0})")]
    NonPositiveDelta(f64),

    /// Coordinates must be finite
    #[error("position must be finite (got x={x}, y={y})")]
    NonFinitePosition { x: f64, y: f64 },

    /// The move is too large for `delta` to be represented
    #[error("motion overflows (vx={vx}, vy={vy}, spd={speed}, acc={acceleration})")]
    NonFiniteState {
        vx: f64,
        vy: f64,
        speed: f64,
        acceleration: f64,
    },
}

/// Errors returned by the profile/session store collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Session record not found: {0}")]
    SessionRecordNotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
