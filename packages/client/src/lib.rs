//! Command-line client for the cursor sharing server.
//!
//! Connects over WebSocket, sends positions typed at a prompt (or generated
//! along a circle) and prints every broadcast it receives.

pub mod args;
pub mod command;
pub mod display;
pub mod error;
pub mod orbit;
mod runner;

pub use args::ClientArgs;
pub use error::ClientError;
pub use runner::run_client;
