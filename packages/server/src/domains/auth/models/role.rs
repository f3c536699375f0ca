use anyhow::Result;
use sqlx::PgPool;

/// Role model - a named bundle of permissions
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    /// Find role by name
    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a role if it does not already exist, returning its id
    pub async fn ensure(name: &str, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO roles (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
