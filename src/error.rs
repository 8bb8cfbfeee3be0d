//! Error model for the session core and its HTTP surface.
//! `SessionError` is what stores return; `AppError` is the serializable envelope the portal
//! server answers with, along with its mapping onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Failures raised by a `SessionStore` backend.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The stored text is not a serialized identity record.
    #[error("malformed session record: {0}")]
    Parse(#[from] serde_json::Error),
    /// The stored text could not be decoded or encoded for the backend's transport.
    #[error("session encoding error: {0}")]
    Encoding(String),
    #[error("session store io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    UserInput { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Parse(e) => AppError::UserInput { code: "malformed_identity".into(), message: e.to_string() },
            SessionError::Encoding(m) => AppError::Internal { code: "session_encoding".into(), message: m },
            SessionError::Io(e) => AppError::Internal { code: "session_io".into(), message: e.to_string() },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({"status": "error", "error": self});
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(AppError::user("bad_input", "oops").http_status(), 400);
        let internal = AppError::Internal { code: "session_io".into(), message: "disk".into() };
        assert_eq!(internal.http_status(), 500);
    }

    #[test]
    fn serializes_tagged_envelope() {
        let v = serde_json::to_value(AppError::user("malformed_identity", "expected object")).unwrap();
        assert_eq!(v["type"], "user_input");
        assert_eq!(v["code"], "malformed_identity");
        assert_eq!(v["message"], "expected object");
    }

    #[test]
    fn session_parse_error_maps_to_user_input() {
        let parse = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let app: AppError = SessionError::from(parse).into();
        assert_eq!(app.http_status(), 400);
        assert_eq!(app.code_str(), "malformed_identity");

        let io: AppError = SessionError::Io(std::io::Error::other("disk")).into();
        assert_eq!(io.http_status(), 500);
        assert_eq!(io.code_str(), "session_io");
    }
}
