use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightdesk_core::{CoreError, RepositoryError};
use flightdesk_shared::{AuthResponse, ErrorMessage};

#[derive(Debug)]
pub enum AppError {
    /// Bad input, unknown ids and unparsable dates all answer 400.
    ValidationError(String),
    /// Failure branch of the login and register endpoints.
    AuthenticationError(String),
    InternalServerError(String),
}

impl AppError {
    /// Maps any service failure on an auth endpoint to the auth failure shape.
    /// Only credential failures and taken usernames reach the client verbatim.
    pub fn auth(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationError(msg) => AppError::AuthenticationError(msg),
            CoreError::RepositoryError(RepositoryError::UniqueViolation(msg)) => AppError::AuthenticationError(msg),
            other => {
                tracing::error!("Auth endpoint failure: {}", other);
                AppError::AuthenticationError("Internal Server Error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorMessage::new(msg))).into_response()
            }
            AppError::AuthenticationError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(AuthResponse::failure(msg))).into_response()
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorMessage::new("Internal Server Error")),
                )
                    .into_response()
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) | CoreError::NotFoundError(msg) | CoreError::ParseError(msg) => {
                AppError::ValidationError(msg)
            }
            CoreError::AuthenticationError(msg) => AppError::AuthenticationError(msg),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}
