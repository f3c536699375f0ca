//! Document CRUD handlers.
//!
//! Every handler here runs behind the permission guard; the `:id` mutation
//! handlers additionally run behind the ownership guard. Handlers read the
//! caller's identity from request extensions, where the pipeline put it.

use axum::extract::{Extension, Multipart, Path, Query};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::common::ApiResponse;
use crate::domains::auth::Identity;
use crate::domains::documents::service::{self, UpdateRequest, UploadInput};
use crate::domains::documents::{Document, DocumentData, DocumentError};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Multipart upload: a `file` part plus an optional comma-separated `tags`
/// part
pub async fn upload_document(
    Extension(state): Extension<AppState>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> Result<ApiResponse<Value>, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut tags: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("File part must carry a filename"))?;
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let contents = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;
                file = Some((filename, content_type, contents.to_vec()));
            }
            Some("tags") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read tags: {e}")))?;
                tags = split_tags(&raw);
            }
            _ => {}
        }
    }

    let (filename, content_type, contents) =
        file.ok_or_else(|| ApiError::bad_request("Missing 'file' part"))?;

    let (document, tag_names) = service::upload_document(
        &state.db_pool,
        &state.file_store,
        UploadInput {
            owner_id: identity.user_id,
            filename,
            content_type,
            contents,
            tags,
        },
    )
    .await?;

    info!(
        document_id = document.id,
        owner_id = identity.user_id,
        "Document uploaded"
    );

    Ok(ApiResponse::created(
        "File uploaded successfully",
        json!({ "document": DocumentData::from_document(document, tag_names) }),
    ))
}

/// List every document in the archive
pub async fn list_documents(
    Extension(state): Extension<AppState>,
) -> Result<ApiResponse<Value>, ApiError> {
    let documents = Document::find_all(&state.db_pool).await?;
    Ok(documents_response(documents))
}

/// List the caller's own documents
pub async fn list_my_documents(
    Extension(state): Extension<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiResponse<Value>, ApiError> {
    let documents = Document::find_by_owner(identity.user_id, &state.db_pool).await?;
    Ok(documents_response(documents))
}

#[derive(Debug, Deserialize)]
pub struct TagSearchQuery {
    #[serde(default)]
    pub tags: String,
}

/// Find documents carrying any of the requested tags
pub async fn search_documents_by_tags(
    Extension(state): Extension<AppState>,
    Query(query): Query<TagSearchQuery>,
) -> Result<ApiResponse<Value>, ApiError> {
    let tag_names = split_tags(&query.tags);
    if tag_names.is_empty() {
        return Err(ApiError::validation(
            "Tags query parameter is required",
            json!(["tags must contain at least one tag name"]),
        ));
    }

    let documents = Document::find_by_tags(&tag_names, &state.db_pool).await?;
    Ok(documents_response(documents))
}

/// Update a document's name, content type, and tags
pub async fn update_document(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::validation(
            "Invalid update request",
            json!(["name must not be empty"]),
        ));
    }

    let (document, tags) = service::update_document(&state.db_pool, id, request).await?;

    info!(document_id = document.id, "Document updated");

    Ok(ApiResponse::ok(
        "Document updated successfully",
        json!({ "document": DocumentData::from_document(document, tags) }),
    ))
}

/// Delete a document
pub async fn delete_document(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Value>, ApiError> {
    let document = Document::find_by_id(id, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(DocumentError::NotFound(id))
        .map_err(ApiError::from)?;

    Document::delete(id, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?;
    let _ = state.file_store.remove(&document.url).await;

    info!(document_id = id, "Document deleted");

    Ok(ApiResponse::ok(
        "Document deleted successfully",
        json!({ "document": DocumentData::from(document) }),
    ))
}

/// Report whether a document changed since the instant in the
/// `Last-Viewed` header (RFC 3339)
pub async fn check_document_freshness(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<ApiResponse<Value>, ApiError> {
    let id = match id.parse::<i64>() {
        Ok(id) if id > 0 => id,
        _ => return Err(ApiError::bad_request("Invalid document ID")),
    };

    let last_viewed = headers
        .get("last-viewed")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Last-Viewed header required"))?;
    let last_viewed = chrono::DateTime::parse_from_rfc3339(last_viewed)
        .map_err(|e| ApiError::validation("Invalid timestamp", json!([e.to_string()])))?
        .with_timezone(&chrono::Utc);

    let updated_at = Document::updated_at_of(id, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(DocumentError::NotFound(id))
        .map_err(ApiError::from)?;

    let update_available = updated_at > last_viewed;
    Ok(ApiResponse::ok(
        if update_available {
            "Document updated"
        } else {
            "Document not updated"
        },
        json!({ "update_available": update_available }),
    ))
}

fn documents_response(documents: Vec<Document>) -> ApiResponse<Value> {
    let documents: Vec<DocumentData> = documents.into_iter().map(DocumentData::from).collect();
    ApiResponse::ok(
        "Documents fetched successfully",
        json!({ "documents": documents }),
    )
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
