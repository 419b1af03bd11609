use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::http::AuthUser;
use crate::models::PublicUser;
use crate::types::form::auth::{CurrentUser, LoginUser, RegisterUser};
use crate::App;

pub async fn register(
    app: web::Data<App>,
    form: web::Json<RegisterUser>,
) -> Result<HttpResponse, ApiError> {
    let response = app.auth.register(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn login(
    app: web::Data<App>,
    form: web::Json<LoginUser>,
) -> Result<HttpResponse, ApiError> {
    let response = app.auth.login(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn me(AuthUser(claims): AuthUser) -> web::Json<CurrentUser> {
    web::Json(CurrentUser {
        user: PublicUser::from(claims),
    })
}
