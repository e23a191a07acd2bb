//! Infrastructure layer: wire DTOs, the session registry and store implementations.

pub mod dto;
pub mod registry;
pub mod repository;

pub use registry::{FanOutReport, SessionRegistry, SessionSnapshot};
