//! Domain layer for cursor synchronization.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod kinematics;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{ClientState, Profile, SessionRecord, Velocity};
pub use error::{KinematicsError, StoreError, ValueObjectError};
pub use factory::{ProfileFactory, SessionIdFactory};
pub use repository::ProfileStore;
pub use session::{ClientSession, SessionLifecycle};
pub use value_object::{Position, SessionId, Timestamp, Username};
