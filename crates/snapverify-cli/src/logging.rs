//! Tracing subscriber setup

use crate::config::Verbosity;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter from `RUST_LOG`, falling back to the verbosity level
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()))
}

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// command output.
pub fn init(verbosity: Verbosity, use_color: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(use_color);
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(verbosity))
        .try_init();
}
