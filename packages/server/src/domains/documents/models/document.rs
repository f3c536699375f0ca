use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Document model - SQL persistence layer
///
/// `owner_id` is written once at creation and never updated afterwards.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub name: String,
    pub content_type: String,
    pub url: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user upload counts for the admin dashboard
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct UploaderStats {
    pub user_id: i64,
    pub username: String,
    pub doc_count: i64,
}

impl Document {
    /// Find document by ID
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all documents, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM documents ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Find documents owned by a user, newest first
    pub async fn find_by_owner(owner_id: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM documents WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Find documents carrying any of the given tags, newest first
    pub async fn find_by_tags(tag_names: &[String], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT DISTINCT d.*
             FROM documents AS d
             JOIN document_tags AS dt ON dt.document_id = d.id
             JOIN tags AS t ON t.id = dt.tag_id
             WHERE t.name = ANY($1)
             ORDER BY d.created_at DESC",
        )
        .bind(tag_names)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Fetch only the last-modified instant of a document
    pub async fn updated_at_of(id: i64, pool: &PgPool) -> Result<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT updated_at FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Delete a document row; returns whether a row was removed
    pub async fn delete(id: i64, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all documents
    pub async fn count(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Count distinct owners who uploaded within the trailing window
    pub async fn count_recent_uploaders(days: i64, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT owner_id) FROM documents
             WHERE created_at >= NOW() - ($1 * INTERVAL '1 day')",
        )
        .bind(days)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Top uploaders by document count
    pub async fn top_uploaders(limit: i64, pool: &PgPool) -> Result<Vec<UploaderStats>> {
        sqlx::query_as::<_, UploaderStats>(
            "SELECT u.id AS user_id, u.username, COUNT(d.id) AS doc_count
             FROM users AS u
             LEFT JOIN documents AS d ON d.owner_id = u.id
             GROUP BY u.id, u.username
             ORDER BY doc_count DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Tag names attached to a document
    pub async fn tag_names(id: i64, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT t.name
             FROM tags AS t
             JOIN document_tags AS dt ON dt.tag_id = t.id
             WHERE dt.document_id = $1
             ORDER BY t.name",
        )
        .bind(id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
