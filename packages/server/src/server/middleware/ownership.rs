//! Per-document ownership guard.
//!
//! Runs strictly after `authorize`, so an identity is always present by the
//! time it executes. Policy: a malformed id is 400, a document that does
//! not exist is 404, a document owned by someone else is 403. The 404/403
//! split mirrors what the list endpoint already reveals to any caller with
//! read access; see DESIGN.md for the disclosure trade-off.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::domains::auth::Identity;
use crate::domains::documents::ownership::is_owner;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Ownership middleware for `/documents/:id` routes
pub async fn verify_ownership(
    state: AppState,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let document_id = parse_document_id(request.uri().path())?;

    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthenticated("Authentication required".to_string()))?;

    let owned = is_owner(&state.db_pool, document_id, identity.user_id)
        .await
        .map_err(ApiError::from)?;

    if !owned {
        debug!(
            user_id = identity.user_id,
            document_id, "Ownership check failed"
        );
        return Err(ApiError::Forbidden(
            "You do not own this document".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Extract and validate the document id segment of the request path.
///
/// A non-numeric or non-positive id is a client input error, rejected
/// before any lookup.
pub fn parse_document_id(path: &str) -> Result<i64, ApiError> {
    let id_str = path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip_while(|s| *s != "documents")
        .nth(1)
        .ok_or_else(|| ApiError::bad_request("Missing document ID"))?;

    match id_str.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request("Invalid document ID")),
    }
}
