//! Tracing subscriber setup.
//!
//! The stream loop logs every classified frame at `debug`. At 60 Hz that
//! drowns everything else, so per-frame events get their own level
//! ([`LoggingConfig::frame_level`]) independent of the global one.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Tracing target of the per-frame iteration events.
pub const FRAME_TARGET: &str = "signlang_stream_engine::stream_loop";

/// Filter directives for a logging config: the global level, then the
/// per-frame override.
pub fn filter_directives(config: &LoggingConfig) -> String {
    format!("{},{}={}", config.level, FRAME_TARGET, config.frame_level)
}

/// Build the filter for a logging config, ignoring the environment.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(filter_directives(config))
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured levels. Installing twice
/// is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| build_filter(config))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if installed.is_ok() {
        tracing::debug!(directives = %filter_directives(config), "Logging initialized");
    }
}
