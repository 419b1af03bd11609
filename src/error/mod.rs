use error_stack::{Context, Report};
use std::borrow::Cow;
use std::fmt::Display;
use tracing_error::SpanTrace;

mod impls;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Broad classes of failures a client can observe. Each one maps
/// to a single HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidRequest,
    UserAlreadyExists,
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    NotFound,
    Outage,
    Unknown,
}

impl ErrorCategory {
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::UserAlreadyExists => "User already exists",
            Self::InvalidCredentials => "Invalid credentials",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::Outage => "Service is temporarily unavailable",
            Self::Unknown => "Internal server error",
        }
    }
}

/// Error returned by services and controllers.
///
/// Only the category and the message ever reach the client; any
/// underlying report is logged when the error is created.
pub struct ApiError {
    category: ErrorCategory,
    message: Cow<'static, str>,
    trace: SpanTrace,
}

impl ApiError {
    #[must_use]
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            category,
            message: Cow::Borrowed(category.default_message()),
            trace: SpanTrace::capture(),
        }
    }

    /// Replaces the default message of the category.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Logs the report and hides it behind a generic message.
    #[must_use]
    pub fn internal<C: Context>(report: Report<C>) -> Self {
        let this = Self::new(ErrorCategory::Unknown);
        tracing::error!(error = ?report, trace = %this.trace, "unexpected error occurred");
        this
    }

    #[must_use]
    pub fn outage<C: Context>(report: Report<C>) -> Self {
        let this = Self::new(ErrorCategory::Outage);
        tracing::warn!(error = ?report, "service is unavailable");
        this
    }
}

impl ApiError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    #[must_use]
    pub fn as_message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiError")
            .field("category", &self.category)
            .field("message", &self.message)
            .field("trace", &self.trace)
            .finish()
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
