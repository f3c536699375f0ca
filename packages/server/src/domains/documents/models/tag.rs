use sqlx::PgConnection;

/// Tag model
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    /// Find or create a tag by name, inside the caller's transaction
    pub async fn find_or_create(name: &str, conn: &mut PgConnection) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING *",
        )
        .bind(name)
        .fetch_one(conn)
        .await
    }

    /// Attach a tag to a document (idempotent)
    pub async fn attach(
        tag_id: i64,
        document_id: i64,
        conn: &mut PgConnection,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO document_tags (document_id, tag_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(document_id)
        .bind(tag_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Remove all tag links for a document
    pub async fn detach_all(document_id: i64, conn: &mut PgConnection) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM document_tags WHERE document_id = $1")
            .bind(document_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
