//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the fallback filter directive used when `RUST_LOG` is not set.
///
/// Binary names use hyphens while tracing targets use the crate path, so
/// `cursorhub-server` becomes `cursorhub_server`.
pub fn default_directive(app_name: &str, level: &str) -> String {
    let target = app_name.replace('-', "_");
    format!("{target}={level},cursorhub_server={level},tower_http={level}")
}

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `app_name` - Binary name, usually `env!("CARGO_BIN_NAME")`
/// * `level` - Default level when `RUST_LOG` is not set
pub fn setup_logger(app_name: &str, level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(app_name, level)));

    // try_init: tests may install a subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
