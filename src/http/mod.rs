use actix_web::{web, HttpResponse, ResponseError};

use crate::error::{ApiError, ErrorCategory};
use crate::App;

pub mod controllers;
pub mod middleware;

mod extract;

pub use self::extract::AuthUser;

use self::controllers::{auth, tickets};
use self::middleware::Authenticate;

/// Registers the application state, extractor settings and every
/// route of the API onto an actix-web app.
///
/// Routes are served both at the root and under `/api`.
pub fn configure(app: web::Data<App>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(app)
            .app_data(web::JsonConfig::default().error_handler(|error, _req| {
                invalid_request(&error)
            }))
            .app_data(web::QueryConfig::default().error_handler(|error, _req| {
                invalid_request(&error)
            }))
            .app_data(web::PathConfig::default().error_handler(|error, _req| {
                invalid_request(&error)
            }))
            .service(web::scope("/api").configure(routes))
            .default_service(web::to(not_found));

        routes(cfg);
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me).wrap(Authenticate::new())),
    )
    .service(
        web::resource("/tickets")
            .route(web::get().to(tickets::list))
            .route(web::post().to(tickets::create).wrap(Authenticate::new())),
    )
    .service(
        web::resource("/tickets/{id}")
            .route(web::get().to(tickets::get))
            .route(web::patch().to(tickets::update).wrap(Authenticate::new()))
            .route(web::delete().to(tickets::delete).wrap(Authenticate::new())),
    );
}

fn invalid_request(error: &impl std::fmt::Display) -> actix_web::Error {
    ApiError::new(ErrorCategory::InvalidRequest)
        .message(error.to_string())
        .into()
}

async fn not_found() -> HttpResponse {
    ApiError::new(ErrorCategory::NotFound).error_response()
}
