//! Startup seeding of roles, permissions, and grants.
//!
//! Idempotent: every statement upserts, so re-running at each boot is safe.
//! Administrative changes to grants after boot are picked up immediately by
//! the resolver because nothing here is cached.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use super::models::Role;
use super::password::hash_password;
use super::Permission;

/// Role grants seeded at startup
const ROLE_GRANTS: [(&str, &[Permission]); 2] = [
    ("admin", &Permission::ALL),
    (
        "user",
        &[Permission::ReadDocument, Permission::UploadDocument],
    ),
];

/// Seed the permission catalog and the default roles with their grants
pub async fn seed_roles_and_permissions(pool: &PgPool) -> Result<()> {
    for permission in Permission::ALL {
        sqlx::query("INSERT INTO permissions (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(permission.as_str())
            .execute(pool)
            .await
            .with_context(|| format!("Failed to seed permission '{}'", permission))?;
    }

    for (role_name, grants) in ROLE_GRANTS {
        let role_id = Role::ensure(role_name, pool)
            .await
            .with_context(|| format!("Failed to seed role '{}'", role_name))?;

        for permission in grants {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id)
                 SELECT $1, id FROM permissions WHERE name = $2
                 ON CONFLICT DO NOTHING",
            )
            .bind(role_id)
            .bind(permission.as_str())
            .execute(pool)
            .await
            .with_context(|| {
                format!(
                    "Failed to grant permission '{}' to role '{}'",
                    permission, role_name
                )
            })?;
        }

        info!(role = role_name, grants = grants.len(), "Seeded role");
    }

    Ok(())
}

/// Create the default admin account when credentials are configured
///
/// Skipped entirely when `ADMIN_USERNAME`/`ADMIN_PASSWORD` are unset or the
/// account already exists.
pub async fn seed_default_admin(
    pool: &PgPool,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let (username, password) = match (username, password) {
        (Some(u), Some(p)) => (u, p),
        _ => return Ok(()),
    };

    let existing = super::models::User::find_by_username(username, pool).await?;
    if existing.is_some() {
        return Ok(());
    }

    let admin_role = Role::find_by_name("admin", pool)
        .await?
        .context("Admin role must be seeded before the default admin user")?;

    let password_hash = hash_password(password).context("Failed to hash admin password")?;
    super::models::User::create(username, &password_hash, admin_role.id, pool).await?;

    info!(username, "Created default admin user");
    Ok(())
}
