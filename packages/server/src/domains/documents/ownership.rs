//! Ownership facts.
//!
//! One primary-key read per check; no relation preloading, so exactly one
//! query happens per authorization decision.

use sqlx::PgPool;

use super::DocumentError;

/// Fetch the owner of a document, or `None` if the document does not exist
pub async fn owner_of(pool: &PgPool, document_id: i64) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>("SELECT owner_id FROM documents WHERE id = $1")
        .bind(document_id)
        .fetch_optional(pool)
        .await
}

/// Check whether a user owns a document.
///
/// Returns `Ok(false)` when the document exists but belongs to someone
/// else; a missing document is `NotFound`, which the caller maps to its
/// disclosure policy.
pub async fn is_owner(pool: &PgPool, document_id: i64, user_id: i64) -> Result<bool, DocumentError> {
    match owner_of(pool, document_id).await? {
        Some(owner_id) => Ok(owner_id == user_id),
        None => Err(DocumentError::NotFound(document_id)),
    }
}
