use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Failure body. Same `is_error`/`message` pair the client keys on, plus a
/// machine-readable `code`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub is_error: bool,
    pub message: String,
    pub code: String,
}

#[derive(Debug)]
pub enum RouteError {
    Unauthorized(&'static str, String),
    Forbidden(&'static str, String),
    BadRequest(&'static str, String),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
    Internal(String),
}

impl RouteError {
    pub fn invalid_credentials() -> Self {
        RouteError::Unauthorized("INVALID_CREDENTIALS", "E-mail or password is incorrect".into())
    }

    pub fn session_expired() -> Self {
        RouteError::Unauthorized("SESSION_EXPIRED", "Session expired".into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RouteError::BadRequest("VALIDATION_ERROR", message.into())
    }

    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            RouteError::Unauthorized(code, msg) => (StatusCode::UNAUTHORIZED, code, msg),
            RouteError::Forbidden(code, msg) => (StatusCode::FORBIDDEN, code, msg),
            RouteError::BadRequest(code, msg) => (StatusCode::BAD_REQUEST, code, msg),
            RouteError::NotFound(code, msg) => (StatusCode::NOT_FOUND, code, msg),
            RouteError::Conflict(code, msg) => (StatusCode::CONFLICT, code, msg),
            RouteError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(%code, %message, "request failed");
        }
        let body = ErrorEnvelope {
            is_error: true,
            message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
