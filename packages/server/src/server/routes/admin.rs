//! Admin statistics dashboard.

use axum::extract::Extension;
use serde_json::{json, Value};

use crate::common::ApiResponse;
use crate::domains::auth::models::User;
use crate::domains::documents::Document;
use crate::server::app::AppState;
use crate::server::error::ApiError;

const ACTIVE_WINDOW_DAYS: i64 = 30;
const TOP_UPLOADERS_LIMIT: i64 = 10;

/// User and document statistics, guarded by `manage_users`
pub async fn admin_stats(
    Extension(state): Extension<AppState>,
) -> Result<ApiResponse<Value>, ApiError> {
    let pool = &state.db_pool;

    let total_users = User::count(pool).await.map_err(ApiError::Internal)?;
    let total_admins = User::count_by_role("admin", pool)
        .await
        .map_err(ApiError::Internal)?;
    let total_documents = Document::count(pool).await.map_err(ApiError::Internal)?;
    let active_users = Document::count_recent_uploaders(ACTIVE_WINDOW_DAYS, pool)
        .await
        .map_err(ApiError::Internal)?;
    let top_uploaders = Document::top_uploaders(TOP_UPLOADERS_LIMIT, pool)
        .await
        .map_err(ApiError::Internal)?;

    let user_document_stats: Vec<Value> = top_uploaders
        .into_iter()
        .map(|s| {
            json!({
                "user_id": s.user_id,
                "username": s.username,
                "doc_count": s.doc_count,
            })
        })
        .collect();

    Ok(ApiResponse::ok(
        "Welcome to the Admin Dashboard",
        json!({
            "total_users": total_users,
            "total_admins": total_admins,
            "total_documents": total_documents,
            "active_users": active_users,
            "user_document_stats": user_document_stats,
        }),
    ))
}
