//! # Logging Setup
//!
//! Installs the tracing subscriber for binaries. Library code only emits
//! events.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=salvage_db=trace` - Trace for the storage crate only
//! - Default: the configured level, `info,salvage=debug,sqlx=warn`

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_FILTER: &str = "info,salvage=debug,sqlx=warn";

/// Initializes logging with the default filter.
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Initializes logging, preferring `RUST_LOG` over `fallback`.
///
/// Output goes to stderr so command output on stdout stays parseable. A
/// second call is a no-op.
pub fn init_with(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(fallback))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs `f` under a temporary stderr subscriber with the default filter.
///
/// Covers work that happens before the configured level is known, such as
/// loading the config file itself.
pub fn bootstrap<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter(DEFAULT_FILTER))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::with_default(subscriber, f)
}

fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}
