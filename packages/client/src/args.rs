//! Command-line arguments.

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cursorhub-client", version, about = "Share your cursor with a cursorhub server")]
pub struct ClientArgs {
    /// Name shown to other clients (1 to 100 characters)
    #[arg(short, long)]
    pub username: String,

    /// WebSocket endpoint of the server
    #[arg(long, default_value = "ws://127.0.0.1:9000/ws")]
    pub url: String,

    /// Move along a circle instead of reading commands
    #[arg(long)]
    pub orbit: bool,

    /// Milliseconds between positions in orbit mode
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,

    /// Radius of the orbit
    #[arg(long, default_value_t = 100.0)]
    pub radius: f64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl ClientArgs {
    /// Endpoint URL with the username query attached.
    pub fn connect_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}username={}", self.url, separator, urlencoding::encode(&self.username))
    }
}
