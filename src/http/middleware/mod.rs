mod auth;
mod telemetry;

pub use self::auth::{Authenticate, AuthenticateMiddleware};
pub use self::telemetry::QuieterRootSpanBuilder;
