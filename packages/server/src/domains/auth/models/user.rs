use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// User model - SQL persistence layer
///
/// Passwords are stored bcrypt-hashed; the plaintext never touches the
/// database. `role_id` references the seeded roles table.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
}

/// User joined with its role name, as needed at login time
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct UserWithRole {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role_name: String,
}

impl User {
    /// Find user by username
    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find user with its role name, for credential verification
    pub async fn find_with_role(username: &str, pool: &PgPool) -> Result<Option<UserWithRole>> {
        sqlx::query_as::<_, UserWithRole>(
            "SELECT u.id, u.username, u.password_hash, r.name AS role_name
             FROM users AS u
             JOIN roles AS r ON r.id = u.role_id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Create a new user with the given (already hashed) password
    pub async fn create(
        username: &str,
        password_hash: &str,
        role_id: i64,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (username, password_hash, role_id)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Count all users
    pub async fn count(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Count users holding the named role
    pub async fn count_by_role(role_name: &str, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users AS u
             JOIN roles AS r ON r.id = u.role_id
             WHERE r.name = $1",
        )
        .bind(role_name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
