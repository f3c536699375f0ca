//! Test harness with testcontainers for integration testing.
//!
//! A single Postgres container is started on first use and shared by every
//! test; migrations and seeding run once against it.

use std::sync::Arc;

use anyhow::{Context, Result};
use archiv_core::domains::auth::{seed, JwtService};
use archiv_core::domains::documents::FileStore;
use archiv_core::server::build_app;
use axum::Router;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "archiv-test";

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        seed::seed_roles_and_permissions(&pool)
            .await
            .context("Failed to seed roles and permissions")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize test infrastructure")
            })
            .await
    }
}

/// Connect a pool to the shared test database
pub async fn test_pool() -> PgPool {
    let infra = SharedTestInfra::get().await;
    PgPool::connect(&infra.db_url)
        .await
        .expect("Failed to connect to test database")
}

/// Token service wired with the test secret
pub fn test_jwt_service() -> Arc<JwtService> {
    Arc::new(
        JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
            .expect("Test JWT service must initialize"),
    )
}

/// Full application router backed by the shared database
pub async fn test_app() -> (Router, PgPool) {
    let pool = test_pool().await;
    let file_store = Arc::new(FileStore::new(
        std::env::temp_dir().join("archiv-test-uploads"),
    ));
    let app = build_app(pool.clone(), test_jwt_service(), file_store);
    (app, pool)
}
