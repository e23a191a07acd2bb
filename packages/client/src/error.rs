//! Client errors.

use cursorhub_server::domain::ValueObjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] ValueObjectError),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
