//! API error handling: translation from core errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// API-level error with an HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    Database(noteum_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

/// Map a unique-constraint violation to a user-facing message, keyed on the
/// constraint names from the schema.
pub fn unique_violation_message(msg: &str) -> Option<&'static str> {
    if msg.contains("app_user_username") {
        Some("Username is already taken")
    } else if msg.contains("app_user_email") {
        Some("User already exists with this email")
    } else if msg.contains("note_pkey") {
        Some("A note with this id already exists")
    } else {
        None
    }
}

impl From<noteum_core::Error> for ApiError {
    fn from(err: noteum_core::Error) -> Self {
        use noteum_core::Error;
        match &err {
            Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            Error::NoteNotFound(id) => ApiError::NotFound(format!("Note {} not found", id)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            Error::Conflict(msg) => ApiError::Conflict(msg.clone()),
            Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    let friendly = unique_violation_message(&msg)
                        .map(str::to_string)
                        .unwrap_or(msg);
                    return ApiError::Conflict(friendly);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
