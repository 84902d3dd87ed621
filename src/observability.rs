//! Logging setup
//!
//! Installs a `tracing_subscriber` fmt subscriber writing to stderr.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LOG_LEVELS;

/// Normalise a configured level, falling back to `info` for unknown names
#[must_use]
pub fn parse_level(level: &str) -> &'static str {
    let lowered = level.trim().to_ascii_lowercase();
    LOG_LEVELS
        .iter()
        .copied()
        .find(|known| *known == lowered)
        .unwrap_or("info")
}

/// Build the filter used by [`init_logging`]
#[must_use]
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(parse_level(level)))
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (repeat calls and
/// tests are harmless).
pub fn init_logging(level: &str) -> bool {
    fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
