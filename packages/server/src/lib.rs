//! Real-time cursor sharing server.
//!
//! Clients connect over WebSocket, report their cursor position and receive
//! the motion state of every connected client after each update.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{build_router, run, serve};
