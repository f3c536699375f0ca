//! Fixture builders for integration tests.
//!
//! Usernames and role names are suffixed with a UUID because the database
//! is shared across the whole test run.

use archiv_core::domains::auth::models::{Role, User};
use archiv_core::domains::auth::password::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Create a user with a unique username holding the given seeded role
pub async fn create_user(pool: &PgPool, role_name: &str) -> User {
    let role = Role::find_by_name(role_name, pool)
        .await
        .expect("Role lookup failed")
        .expect("Role must be seeded");

    let username = format!("{}-{}", role_name, Uuid::new_v4());
    let password_hash = hash_password(TEST_PASSWORD).expect("Hashing failed");

    User::create(&username, &password_hash, role.id, pool)
        .await
        .expect("User creation failed")
}

/// Create a bespoke role with the given permission grants.
///
/// Tests that mutate grants use their own role so the shared seeded roles
/// stay untouched.
pub async fn create_role_with_permissions(pool: &PgPool, permissions: &[&str]) -> String {
    let role_name = format!("role-{}", Uuid::new_v4());
    let role_id = Role::ensure(&role_name, pool)
        .await
        .expect("Role creation failed");

    for permission in permissions {
        grant_permission(pool, role_id, permission).await;
    }

    role_name
}

pub async fn grant_permission(pool: &PgPool, role_id: i64, permission: &str) {
    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id)
         SELECT $1, id FROM permissions WHERE name = $2
         ON CONFLICT DO NOTHING",
    )
    .bind(role_id)
    .bind(permission)
    .execute(pool)
    .await
    .expect("Grant failed");
}

pub async fn revoke_permission(pool: &PgPool, role_name: &str, permission: &str) {
    sqlx::query(
        "DELETE FROM role_permissions
         WHERE role_id = (SELECT id FROM roles WHERE name = $1)
           AND permission_id = (SELECT id FROM permissions WHERE name = $2)",
    )
    .bind(role_name)
    .bind(permission)
    .execute(pool)
    .await
    .expect("Revoke failed");
}

/// Insert a document owned by the given user, returning its id
pub async fn create_document(pool: &PgPool, owner_id: i64, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO documents (name, content_type, url, owner_id)
         VALUES ($1, 'text/plain', $2, $3)
         RETURNING id",
    )
    .bind(name)
    .bind(format!("uploads/{}", Uuid::new_v4()))
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .expect("Document creation failed")
}
