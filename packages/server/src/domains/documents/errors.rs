use thiserror::Error;

/// Document domain errors
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}
