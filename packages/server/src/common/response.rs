//! Common response envelope.
//!
//! Every success response carries `{status, message, data}` so clients can
//! handle all endpoints uniformly; rejections use the matching error shape
//! in `server::error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

/// JSON success envelope
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    message: String,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }

    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": self.status.canonical_reason().unwrap_or("Unknown"),
            "message": self.message,
            "data": self.data,
        }));
        (self.status, body).into_response()
    }
}
