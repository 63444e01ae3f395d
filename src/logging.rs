// src/logging.rs
// =============================================================================
// Structured logging with tracing.
//
// Logs go to stderr so the run summary on stdout stays clean (and valid
// JSON with --json). RUST_LOG wins over --verbose when it is set.
// =============================================================================

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,kosova_crawl=debug"
    } else {
        "info"
    }
}

pub fn init(verbose: bool, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}
