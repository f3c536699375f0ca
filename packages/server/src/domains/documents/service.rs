//! Upload and update services.
//!
//! Document and tag writes share one transaction; the file write happens
//! first so a failed insert never leaves a dangling database row.

use anyhow::{Context, Result};
use sqlx::PgPool;

use super::models::{Document, Tag};
use super::{DocumentError, FileStore};

/// Input for a file upload
#[derive(Debug)]
pub struct UploadInput {
    pub owner_id: i64,
    pub filename: String,
    pub content_type: String,
    pub contents: Vec<u8>,
    pub tags: Vec<String>,
}

/// Requested changes to an existing document
#[derive(Debug, serde::Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Persist an uploaded file and create its document record.
///
/// Returns the created document together with its tag names.
pub async fn upload_document(
    pool: &PgPool,
    store: &FileStore,
    input: UploadInput,
) -> Result<(Document, Vec<String>)> {
    let stored_path = store.save(&input.filename, &input.contents).await?;

    let tags = normalize_tags(input.tags);

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let document = sqlx::query_as::<_, Document>(
        "INSERT INTO documents (name, content_type, url, owner_id)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(&input.filename)
    .bind(&input.content_type)
    .bind(&stored_path)
    .bind(input.owner_id)
    .fetch_one(&mut *tx)
    .await;

    let document = match document {
        Ok(document) => document,
        Err(e) => {
            // Roll back happens on drop; don't keep the orphaned file
            drop(tx);
            let _ = store.remove(&stored_path).await;
            return Err(e).context("Failed to create document record");
        }
    };

    for name in &tags {
        let tag = Tag::find_or_create(name, &mut tx).await?;
        Tag::attach(tag.id, document.id, &mut tx).await?;
    }

    tx.commit().await.context("Failed to commit upload")?;

    Ok((document, tags))
}

/// Apply an update to a document's name, content type, and tags.
///
/// The caller has already passed the ownership check; this only fails with
/// `NotFound` if the document vanished in between.
pub async fn update_document(
    pool: &PgPool,
    document_id: i64,
    request: UpdateRequest,
) -> Result<(Document, Vec<String>), DocumentError> {
    let tags = normalize_tags(request.tags);

    let mut tx = pool.begin().await?;

    let document = sqlx::query_as::<_, Document>(
        "UPDATE documents
         SET name = $2, content_type = $3, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(document_id)
    .bind(&request.name)
    .bind(&request.content_type)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DocumentError::NotFound(document_id))?;

    Tag::detach_all(document.id, &mut tx).await?;
    for name in &tags {
        let tag = Tag::find_or_create(name, &mut tx).await?;
        Tag::attach(tag.id, document.id, &mut tx).await?;
    }

    tx.commit().await?;

    Ok((document, tags))
}

/// Trim, drop empties, and fall back to the default tag
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    normalized.dedup();
    if normalized.is_empty() {
        normalized.push("untagged".to_string());
    }
    normalized
}
