use thiserror::Error;

/// Authorization errors for the archive backend
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}
