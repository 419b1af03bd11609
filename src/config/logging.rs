use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct Logging {
    /// **Environment variable**: `HELPDESK_LOGGING_TARGETS`
    ///
    /// Filters logging events with [`tracing_subscriber::EnvFilter`]
    /// directives. `RUST_LOG` takes precedence if both are set.
    #[serde(default)]
    pub targets: Option<String>,

    /// **Environment variable**: `HELPDESK_LOGGING_STYLE`
    ///
    /// There are four styles to choose:
    /// - `compact` - compacts logs but it is readable enough
    /// - `full` - default formatter from [`tracing_subscriber`].
    /// - `pretty` - makes logs pretty
    /// - `json` - serializes logs into JSON data
    #[serde(default)]
    pub style: LoggingStyle,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LoggingStyle {
    Compact,
    #[default]
    Full,
    Pretty,
    JSON,
}

impl Display for LoggingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Full => "full",
            Self::Pretty => "pretty",
            Self::JSON => "json",
        })
    }
}

impl TryFrom<String> for LoggingStyle {
    type Error = InvalidLoggingStyle;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} logging style")]
pub struct InvalidLoggingStyle(String);

impl FromStr for LoggingStyle {
    type Err = InvalidLoggingStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Compact, Self::Full, Self::Pretty, Self::JSON]
            .into_iter()
            .find(|style| s.eq_ignore_ascii_case(&style.to_string()))
            .ok_or_else(|| InvalidLoggingStyle(s.to_string()))
    }
}
