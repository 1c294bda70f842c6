//! Diagnostic logging to stderr.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` overrides the level picked from `-v` flags and the config.
pub fn init(verbosity: u8, configured: Option<&str>) {
    let level = level_for(verbosity, configured);

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

fn level_for(verbosity: u8, configured: Option<&str>) -> LevelFilter {
    match verbosity {
        0 => configured.and_then(parse_level).unwrap_or(LevelFilter::WARN),
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
