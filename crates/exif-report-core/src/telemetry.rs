//! Log output for the `exif-report` binary.
//!
//! Everything goes to stderr; stdout is reserved for the one-line run summary
//! so CI steps can capture it.

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Shape of emitted log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One flattened JSON object per event, with the enclosing run span.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Install the global subscriber.
///
/// `level` applies to every target; `RUST_LOG` directives are layered on
/// top, so `RUST_LOG=exif_report_core::publish=trace` raises one module
/// without silencing the rest. Returns `false` when a subscriber was
/// already installed.
pub fn init_tracing(format: LogFormat, level: Level) -> bool {
    let overrides = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let (text, json) = match format {
        LogFormat::Text => (
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(run_filter(level, overrides.as_deref()))
        .with(text)
        .with(json)
        .try_init()
        .is_ok()
}

fn run_filter(level: Level, overrides: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(overrides.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_level() {
        let filter = run_filter(Level::DEBUG, None).to_string();
        assert!(filter.contains("debug"), "filter was {filter}");
    }

    #[test]
    fn test_filter_keeps_env_overrides() {
        let filter = run_filter(Level::INFO, Some("exif_report_core::publish=trace")).to_string();
        assert!(filter.contains("exif_report_core::publish=trace"), "filter was {filter}");
    }

    #[test]
    fn test_log_format_from_flag() {
        assert_eq!(LogFormat::from_json_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_json_flag(false), LogFormat::default());
    }

    #[test]
    fn test_second_install_is_refused() {
        init_tracing(LogFormat::Text, Level::INFO);
        assert!(!init_tracing(LogFormat::Json, Level::DEBUG));
    }
}
