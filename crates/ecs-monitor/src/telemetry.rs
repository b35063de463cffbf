//! Tracing setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "ecs_monitor=info,warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line (function runtime, log aggregation).
    Json,
    /// Human-readable text (CLI).
    Pretty,
}

/// Build the env filter, honoring `RUST_LOG` when set.
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ecs_monitor=debug,info")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    })
}

/// Install the global subscriber.
pub fn init_tracing(format: LogFormat, verbose: bool) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(verbose));

    match format {
        LogFormat::Json => builder
            .json()
            .with_current_span(false)
            .without_time()
            .with_target(false)
            .init(),
        LogFormat::Pretty => builder.with_target(false).init(),
    }
}
