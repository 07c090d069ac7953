//! HTTP error responses.
//!
//! Every failure leaves the API as `{error, message, code, details?}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::types::errors::{BookmarkError, ValidationError};

/// Error type returned by every request handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No owner identity on the request.
    #[error("Authentication required")]
    Unauthorized,

    /// Query string failed validation.
    #[error("Invalid query parameters")]
    InvalidParams(ValidationError),

    /// Body is not parseable JSON.
    #[error("Invalid JSON body")]
    InvalidJson(String),

    /// Body parsed but a field is out of bounds.
    #[error("Invalid bookmark data")]
    Validation(ValidationError),

    /// Path id is not a UUID.
    #[error("Invalid bookmark ID")]
    InvalidId,

    /// Missing, or owned by someone else.
    #[error("Bookmark not found")]
    NotFound,

    /// The owner already bookmarked this URL.
    #[error("This URL is already bookmarked")]
    Duplicate { existing_id: String },

    /// The caller exhausted its creation window.
    #[error("Too many requests, try again later")]
    RateLimited,

    /// Store failure. The detail is logged where it happens, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidParams(_) | Self::InvalidJson(_) | Self::Validation(_) | Self::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "AUTH_REQUIRED",
            Self::InvalidParams(_) => "INVALID_PARAMS",
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::NotFound => "NOT_FOUND",
            Self::Duplicate { .. } => "DUPLICATE_URL",
            Self::RateLimited => "RATE_LIMITED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn label(&self) -> &'static str {
        match self.status() {
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::TOO_MANY_REQUESTS => "Too Many Requests",
            _ => "Internal Server Error",
        }
    }
}

impl From<BookmarkError> for ApiError {
    fn from(err: BookmarkError) -> Self {
        match err {
            BookmarkError::DuplicateUrl { existing_id, .. } => Self::Duplicate { existing_id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON whose shape does not match the body type.
            JsonRejection::JsonDataError(e) => Self::Validation(ValidationError::single(
                "body",
                e.body_text(),
            )),
            other => Self::InvalidJson(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.label(),
            "message": match &self {
                Self::Internal(_) => "Internal server error".to_string(),
                other => other.to_string(),
            },
            "code": self.code(),
        });

        let details: Option<Value> = match &self {
            Self::InvalidParams(v) | Self::Validation(v) => Some(json!(v.fields())),
            Self::InvalidJson(reason) => Some(json!(reason)),
            _ => None,
        };
        if let Some(details) = details {
            body["details"] = details;
        }
        if let Self::Duplicate { existing_id } = &self {
            body["existingId"] = json!(existing_id);
        }

        (self.status(), Json(body)).into_response()
    }
}
