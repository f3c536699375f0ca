//! Authentication + authorization guard.
//!
//! Stage 1: a well-formed `Bearer` token that verifies -> identity.
//! Stage 2: the identity's role must currently grant the permission bound
//! to the route. Failing either stage ends the request (401/403) before the
//! handler runs and without attaching an identity. Permissions are resolved
//! from the database on every request, so grant changes apply immediately.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::domains::auth::{permissions, Identity, JwtService, Permission};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Permission-guard middleware
///
/// Bound to a route with its required permission at registration time:
///
/// ```ignore
/// .route_layer(middleware::from_fn(move |req, next| {
///     authorize(state.clone(), Permission::DeleteDocument, req, next)
/// }))
/// ```
pub async fn authorize(
    state: AppState,
    required: Permission,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(&request, &state.jwt_service)?;

    let allowed = permissions::has_permission(&state.db_pool, &identity.role_name, required)
        .await
        .map_err(ApiError::from)?;

    if !allowed {
        debug!(
            user_id = identity.user_id,
            role = %identity.role_name,
            permission = %required,
            "Permission denied"
        );
        return Err(ApiError::Forbidden(format!(
            "Permission '{}' required",
            required
        )));
    }

    debug!(
        user_id = identity.user_id,
        role = %identity.role_name,
        permission = %required,
        "Request authorized"
    );
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extract and verify the bearer token from a request
///
/// The `Bearer` scheme is mandatory on the wire; a missing header or any
/// other scheme is rejected before the token service or the store is
/// consulted.
pub fn authenticate(
    request: &Request<Body>,
    jwt_service: &JwtService,
) -> Result<Identity, ApiError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .ok_or_else(|| ApiError::Unauthenticated("Authorization header required".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthenticated("Invalid Authorization header".to_string()))?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthenticated("Authorization header must use the Bearer scheme".to_string())
    })?;

    jwt_service.verify(token).map_err(ApiError::from)
}
