//! Registration and login.

use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::common::ApiResponse;
use crate::domains::auth::models::{Role, User};
use crate::domains::auth::password::{hash_password, verify_password};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create a new account with the default `user` role
pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    let mut field_errors = Vec::new();
    if payload.username.trim().is_empty() {
        field_errors.push("username must not be empty");
    }
    if payload.password.len() < 8 {
        field_errors.push("password must be at least 8 characters");
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation(
            "Invalid registration request",
            json!(field_errors),
        ));
    }

    let role = Role::find_by_name("user", &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::Config("Default role 'user' is not seeded".to_string()))?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to hash password: {e}")))?;

    let user = match User::create(
        payload.username.trim(),
        &password_hash,
        role.id,
        &state.db_pool,
    )
    .await
    {
        Ok(user) => user,
        Err(e) => {
            if let Some(sqlx::Error::Database(db)) = e.downcast_ref::<sqlx::Error>() {
                if db.is_unique_violation() {
                    return Err(ApiError::bad_request("Username already taken"));
                }
            }
            return Err(ApiError::Internal(e));
        }
    };

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok(ApiResponse::created(
        "User created successfully",
        json!({ "id": user.id, "username": user.username }),
    ))
}

/// Verify credentials and issue a 24-hour JWT
///
/// Failure detail is uniform so callers cannot probe which usernames exist.
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    let invalid = || ApiError::Unauthenticated("Invalid username or password".to_string());

    let user = User::find_with_role(&payload.username, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(invalid)?;

    let password_ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to verify password: {e}")))?;
    if !password_ok {
        return Err(invalid());
    }

    let token = state.jwt_service.issue(user.id, &user.role_name)?;

    info!(user_id = user.id, role = %user.role_name, "User logged in");

    Ok(ApiResponse::ok(
        "Logged in successfully",
        json!({ "token": token }),
    ))
}
