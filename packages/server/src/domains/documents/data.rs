use serde::{Deserialize, Serialize};

use super::models::Document;

/// Serializable view of a document, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    pub owner_id: i64,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl DocumentData {
    pub fn from_document(document: Document, tags: Vec<String>) -> Self {
        Self {
            id: document.id,
            name: document.name,
            content_type: document.content_type,
            url: document.url,
            owner_id: document.owner_id,
            tags,
            created_at: document.created_at.to_rfc3339(),
            updated_at: document.updated_at.to_rfc3339(),
        }
    }
}

impl From<Document> for DocumentData {
    fn from(document: Document) -> Self {
        Self::from_document(document, Vec::new())
    }
}
