//! Cursor sharing server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cursorhub-server -- --port 9000
//! ```

use clap::Parser;
use cursorhub_server::ServerConfig;
use cursorhub_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = cursorhub_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
