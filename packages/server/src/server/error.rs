//! HTTP-facing error taxonomy.
//!
//! Every rejection is terminal for the request and serializes to
//! `{status, message, errors?}`. Store failures map to 500 and are logged
//! server-side; response bodies never carry SQL text or stack traces, and a
//! store failure during an authorization check is never downgraded to 403.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::domains::auth::AuthError;
use crate::domains::documents::DocumentError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<Value>,
    },

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error")]
    Store(#[source] sqlx::Error),

    #[error("{0}")]
    Config(String),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Validation failure with a machine-readable detail payload
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Some(details),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Config(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::MissingSecret => ApiError::Config(err.to_string()),
            // The identity's role no longer exists; deny, don't 500
            AuthError::RoleNotFound(role) => {
                ApiError::Forbidden(format!("Role '{}' has no access", role))
            }
            AuthError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) => ApiError::NotFound("Document not found".to_string()),
            DocumentError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Store(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &self {
                ApiError::Store(e) => error!(error = %e, "Store failure"),
                ApiError::Internal(e) => error!(error = %e, "Internal failure"),
                ApiError::Config(msg) => error!(error = %msg, "Configuration failure"),
                _ => {}
            }
        }

        let mut body = json!({
            "status": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
        });
        if let ApiError::BadRequest {
            details: Some(details),
            ..
        } = &self
        {
            body["errors"] = details.clone();
        }

        (status, Json(body)).into_response()
    }
}
