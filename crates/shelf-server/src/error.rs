use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shelf_catalog::ServiceError;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status and caller-facing message. Faults get a generic message;
    /// their details only go to the log.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Service(err) => match err {
                ServiceError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                ServiceError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                ServiceError::Storage(_) | ServiceError::Internal(_) => internal(),
            },
            Self::Auth(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => internal(),
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!(status = status.as_u16(), "request rejected: {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_store::StoreError;

    fn status_of(err: impl Into<ServerError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn service_errors_map_to_distinct_statuses() {
        assert_eq!(status_of(ServiceError::invalid_input("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(status_of(ServiceError::unauthenticated("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ServiceError::not_found("x")), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(status_of(AuthError::MissingHeader), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::InvalidFormat), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::InvalidToken), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn faults_hide_details() {
        let err = ServerError::from(ServiceError::Storage(StoreError::Io(
            std::io::Error::other("disk on fire"),
        )));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }
}
