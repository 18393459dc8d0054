use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::BrowseError;
use crate::services::store::StoreError;

/// A lightweight wrapper for request errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

/// Map the service taxonomy onto HTTP statuses: validation errors are the
/// caller's fault, a missing object is 404, refused credentials 403, and
/// anything else from the store is a bad gateway.
impl From<BrowseError> for AppError {
    fn from(err: BrowseError) -> Self {
        match err {
            BrowseError::InvalidRequest(reason) => AppError::new(StatusCode::BAD_REQUEST, reason),
            BrowseError::Store(store_err) => match store_err {
                StoreError::NotFound { .. } => AppError::not_found(store_err.to_string()),
                StoreError::AccessDenied(_) => {
                    AppError::new(StatusCode::FORBIDDEN, store_err.to_string())
                }
                StoreError::Backend(_) => {
                    AppError::new(StatusCode::BAD_GATEWAY, store_err.to_string())
                }
            },
        }
    }
}
