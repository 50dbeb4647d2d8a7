// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::registration::{FieldError, RegistrationError};

const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";
const ALREADY_EXISTS_MESSAGE: &str = "User already exists";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(Vec<FieldError>),
    InvalidJson(String),

    // 500 Internal Server Error; the message is for the server log only
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to JSON response body. Server errors have no body.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ApiError::BadRequest(errors) => Some(json!({ "errors": errors })),
            ApiError::InvalidJson(_) => {
                Some(json!({ "errors": [FieldError::message(INVALID_JSON_MESSAGE)] }))
            }
            ApiError::InternalServerError(_) => None,
        }
    }
}

impl ApiError {
    pub fn bad_request(errors: Vec<FieldError>) -> Self {
        ApiError::BadRequest(errors)
    }

    pub fn already_exists() -> Self {
        ApiError::BadRequest(vec![FieldError::message(ALREADY_EXISTS_MESSAGE)])
    }

    pub fn invalid_json(detail: impl Into<String>) -> Self {
        ApiError::InvalidJson(detail.into())
    }

    pub fn internal_server_error(detail: impl Into<String>) -> Self {
        ApiError::InternalServerError(detail.into())
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(errors) => ApiError::bad_request(errors),
            RegistrationError::AlreadyExists => ApiError::already_exists(),
            RegistrationError::Storage(db_err) => {
                // Log the real error but return an empty 500
                tracing::error!("Account store error: {}", db_err);
                ApiError::internal_server_error(db_err.to_string())
            }
            RegistrationError::Signing(jwt_err) => {
                tracing::error!("Token signing error: {}", jwt_err);
                ApiError::internal_server_error(jwt_err.to_string())
            }
            other => {
                tracing::error!("Registration failed: {}", other);
                ApiError::internal_server_error(other.to_string())
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(errors) => write!(f, "bad request ({} error(s))", errors.len()),
            ApiError::InvalidJson(detail) => write!(f, "{}: {}", INVALID_JSON_MESSAGE, detail),
            ApiError::InternalServerError(detail) => write!(f, "internal server error: {}", detail),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self.to_json() {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}
