use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

use crate::auth::Claims;
use crate::error::{ApiError, ErrorCategory};

/// Identity of the caller, attached by the
/// [`Authenticate`](crate::http::middleware::Authenticate) middleware.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        ready(claims.map(Self).ok_or_else(|| ApiError::new(ErrorCategory::Unauthorized)))
    }
}
