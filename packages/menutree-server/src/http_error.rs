//! Error responses in the `{"error": CODE, "message": text}` shape.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use menutree_core::Error;

#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "VALIDATION_ERROR" | "INVALID_OPERATION" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" | "PARENT_NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = err.code();
        match err {
            Error::NotFound(_) => ApiError::new(code, "Menu not found"),
            Error::ParentNotFound(_) => ApiError::new(code, "Parent menu not found"),
            Error::Validation(message) | Error::InvalidOperation(message) => {
                ApiError::new(code, message)
            }
            Error::InconsistentState(_) | Error::Storage(_) => {
                tracing::error!(error = %err, "menu store failure");
                ApiError::new(code, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new("VALIDATION_ERROR", rejection.body_text())
    }
}
