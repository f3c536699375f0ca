//! Role -> permission resolution.
//!
//! Permissions form a closed set; routes bind to exactly one of them at
//! registration time. Grants are read from the database on every check so
//! that revoking a permission takes effect on the very next request.

use std::collections::HashSet;
use std::str::FromStr;

use sqlx::PgPool;

use super::AuthError;

/// Capabilities in the archive backend
///
/// The string forms are the rows seeded into the `permissions` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// List and read documents
    ReadDocument,

    /// Upload new documents
    UploadDocument,

    /// Update existing documents (subject to ownership)
    UpdateDocument,

    /// Delete documents (subject to ownership)
    DeleteDocument,

    /// Admin-only access to user and document statistics
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::ReadDocument,
        Permission::UploadDocument,
        Permission::UpdateDocument,
        Permission::DeleteDocument,
        Permission::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadDocument => "read_document",
            Permission::UploadDocument => "upload_document",
            Permission::UpdateDocument => "update_document",
            Permission::DeleteDocument => "delete_document",
            Permission::ManageUsers => "manage_users",
        }
    }
}

impl FromStr for Permission {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read_document" => Ok(Permission::ReadDocument),
            "upload_document" => Ok(Permission::UploadDocument),
            "update_document" => Ok(Permission::UpdateDocument),
            "delete_document" => Ok(Permission::DeleteDocument),
            "manage_users" => Ok(Permission::ManageUsers),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the current permission set granted to a role.
///
/// Executes the permissions/role_permissions/roles join fresh on every call;
/// results are never cached. Permission names in the table that fall outside
/// the closed set are skipped, never granted.
pub async fn permissions_for_role(
    pool: &PgPool,
    role_name: &str,
) -> Result<HashSet<Permission>, AuthError> {
    let role_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM roles WHERE name = $1")
        .bind(role_name)
        .fetch_optional(pool)
        .await?;

    if role_exists.is_none() {
        return Err(AuthError::RoleNotFound(role_name.to_string()));
    }

    let names = sqlx::query_scalar::<_, String>(
        "SELECT p.name
         FROM permissions AS p
         JOIN role_permissions AS rp ON rp.permission_id = p.id
         JOIN roles AS r ON r.id = rp.role_id
         WHERE r.name = $1",
    )
    .bind(role_name)
    .fetch_all(pool)
    .await?;

    Ok(names
        .iter()
        .filter_map(|name| Permission::from_str(name).ok())
        .collect())
}

/// Check whether a role currently grants a permission.
///
/// A missing role or a missing grant both answer `false` (deny by default);
/// only store failures propagate, so an unavailable database is never
/// reported as "permission denied".
pub async fn has_permission(
    pool: &PgPool,
    role_name: &str,
    permission: Permission,
) -> Result<bool, AuthError> {
    match permissions_for_role(pool, role_name).await {
        Ok(granted) => Ok(granted.contains(&permission)),
        Err(AuthError::RoleNotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
