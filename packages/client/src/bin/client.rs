//! Interactive cursor sharing client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cursorhub-client -- --username alice
//! cargo run --bin cursorhub-client -- --username bob --orbit
//! ```

use clap::Parser;
use cursorhub_client::ClientArgs;
use cursorhub_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the client
    if let Err(e) = cursorhub_client::run_client(args).await {
        tracing::error!("Client error: {}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    // The prompt thread may still be blocked reading stdin
    std::process::exit(0);
}
