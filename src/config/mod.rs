use thiserror::Error;

mod auth;
mod database;
mod logging;
mod server;

pub use self::auth::Auth;
pub use self::database::Database;
pub use self::logging::{InvalidLoggingStyle, Logging, LoggingStyle};
pub use self::server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
