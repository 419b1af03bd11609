use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use serde_json::json;
use validator::ValidationErrors;

use super::{ApiError, ErrorCategory};
use crate::database;
use crate::util::validation::describe;

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::InvalidRequest
            | ErrorCategory::UserAlreadyExists
            | ErrorCategory::InvalidCredentials => StatusCode::BAD_REQUEST,
            ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Outage => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.as_message(),
        }))
    }
}

impl From<Report<database::Error>> for ApiError {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::UnhealthyPool => Self::outage(value),
            _ => Self::internal(value),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        Self::new(ErrorCategory::InvalidRequest).message(describe(&value))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::internal(Report::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn should_map_categories_to_status_codes() {
        let cases = [
            (ErrorCategory::InvalidRequest, StatusCode::BAD_REQUEST),
            (ErrorCategory::UserAlreadyExists, StatusCode::BAD_REQUEST),
            (ErrorCategory::InvalidCredentials, StatusCode::BAD_REQUEST),
            (ErrorCategory::Unauthorized, StatusCode::UNAUTHORIZED),
            (ErrorCategory::Forbidden, StatusCode::FORBIDDEN),
            (ErrorCategory::NotFound, StatusCode::NOT_FOUND),
            (ErrorCategory::Outage, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorCategory::Unknown, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (category, status) in cases {
            assert_eq!(ApiError::new(category).status_code(), status, "{category:?}");
        }
    }

    #[test]
    fn should_hide_database_details() {
        let error = ApiError::from(Report::new(database::Error::Query));
        assert_eq!(error.category(), ErrorCategory::Unknown);
        assert_eq!(error.as_message(), "Internal server error");

        let error = ApiError::from(Report::new(database::Error::UnhealthyPool));
        assert_eq!(error.category(), ErrorCategory::Outage);
    }

    #[actix_web::test]
    async fn should_render_error_body() {
        let response = ApiError::new(ErrorCategory::NotFound)
            .message("Ticket not found")
            .error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Ticket not found" }));
    }
}
