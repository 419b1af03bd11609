use error_stack::{Result, ResultExt};
use std::io::IsTerminal;
use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::Logging;

mod formatter;

pub use self::formatter::Formatter;

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct LoggingInitError;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.targets` when both are set.
pub fn init(config: &Logging) -> Result<(), LoggingInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let targets = rust_log
        .as_deref()
        .or(config.targets.as_deref())
        .unwrap_or_default();

    let ansi = std::io::stderr().is_terminal();
    let filter = make_env_filter(targets);

    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let fmt = match Formatter::from_style(config.style, ansi) {
        Some(formatter) => fmt.event_format(formatter).boxed(),
        None => fmt.json().boxed(),
    };

    let registry = tracing_subscriber::registry()
        .with(fmt.with_filter(filter))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(LoggingInitError)
        .attach_printable("already initialized tracing")?;

    if rust_log.is_some() && config.targets.is_some() {
        warn!("Both `RUST_LOG` and `logging.targets` are set, `RUST_LOG` will be used");
    }

    Ok(())
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingStyle;

    #[test]
    fn env_filter_falls_back_to_default_level() {
        let filter = make_env_filter("");
        let expected = if cfg!(debug_assertions) { "debug" } else { "info" };
        assert!(filter.to_string().to_lowercase().contains(expected));

        let filter = make_env_filter("helpdesk=trace");
        assert!(filter.to_string().to_lowercase().contains("helpdesk=trace"));
    }

    #[test]
    fn formatter_is_not_used_for_json() {
        assert!(Formatter::from_style(LoggingStyle::JSON, false).is_none());
        assert!(Formatter::from_style(LoggingStyle::Compact, false).is_some());
    }
}
