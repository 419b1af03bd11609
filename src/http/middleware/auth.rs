use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::auth::Claims;
use crate::error::{ApiError, ErrorCategory};
use crate::models::Role;
use crate::App;

/// Rejects requests without a valid bearer token.
///
/// The decoded [`Claims`] are stored in the request extensions and
/// can be read with the [`AuthUser`](crate::http::AuthUser) extractor.
/// When roles are given, tokens of any other role get `403 Forbidden`.
///
/// ```rust,ignore
/// web::resource("/tickets").route(web::post().to(create).wrap(Authenticate::new()))
/// ```
#[derive(Debug, Clone)]
pub struct Authenticate {
    roles: Rc<[Role]>,
}

impl Default for Authenticate {
    fn default() -> Self {
        Self::new()
    }
}

impl Authenticate {
    /// Accepts any authenticated user regardless of their role.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: Rc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_roles(roles: &[Role]) -> Self {
        Self {
            roles: roles.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service,
            roles: self.roles.clone(),
        }))
    }
}

/// Service wrapper produced by [`Authenticate`].
pub struct AuthenticateMiddleware<S> {
    service: S,
    roles: Rc<[Role]>,
}

impl<S> AuthenticateMiddleware<S> {
    #[tracing::instrument(skip_all, name = "middleware.auth")]
    fn authorize(&self, req: &ServiceRequest) -> Result<Claims, ApiError> {
        let Some(token) = bearer_token(req) else {
            return Err(ApiError::new(ErrorCategory::Unauthorized));
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            tracing::error!("App is not registered as app data");
            return Err(ApiError::new(ErrorCategory::Unknown));
        };

        let claims = app.auth.verify_token(token)?;
        if !self.roles.is_empty() && !self.roles.contains(&claims.role) {
            tracing::debug!(user.id = %claims.id, role = %claims.role, "role is not allowed");
            return Err(ApiError::new(ErrorCategory::Forbidden));
        }

        Ok(claims)
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authorize(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => {
                let response = req.into_response(error.error_response());
                Box::pin(ready(Ok(response.map_into_right_body())))
            }
        }
    }
}
