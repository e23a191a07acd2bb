//! Server configuration.
//!
//! Every option can be given as a command-line flag or through the
//! environment variable of the same name.

use clap::Parser;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 32;
pub const DEFAULT_BROADCAST_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Parser)]
#[command(name = "cursorhub-server", version, about = "Real-time cursor sharing server")]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Frames buffered per client before broadcasts to it are dropped
    #[arg(long, env = "OUTBOUND_CAPACITY", default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,

    /// Pending broadcast requests before new ones are coalesced
    #[arg(long, env = "BROADCAST_QUEUE_CAPACITY", default_value_t = DEFAULT_BROADCAST_QUEUE_CAPACITY)]
    pub broadcast_queue_capacity: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            broadcast_queue_capacity: DEFAULT_BROADCAST_QUEUE_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Check values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host cannot be empty".to_string());
        }
        if self.outbound_capacity == 0 {
            return Err("outbound_capacity must be at least 1".to_string());
        }
        if self.broadcast_queue_capacity == 0 {
            return Err("broadcast_queue_capacity must be at least 1".to_string());
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
