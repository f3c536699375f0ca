// Main entry point for the archive API server

use std::sync::Arc;

use anyhow::{Context, Result};
use archiv_core::domains::auth::{seed, JwtService};
use archiv_core::domains::documents::FileStore;
use archiv_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,archiv_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Archiv System API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // The signing secret is injected here, once, before any request is
    // served; a missing secret aborts startup
    let jwt_service = Arc::new(
        JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())
            .context("Failed to initialize token service")?,
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Seed roles, permissions, and the optional default admin
    seed::seed_roles_and_permissions(&pool)
        .await
        .context("Failed to seed roles and permissions")?;
    seed::seed_default_admin(
        &pool,
        config.admin_username.as_deref(),
        config.admin_password.as_deref(),
    )
    .await
    .context("Failed to seed default admin")?;

    // Build application
    let file_store = Arc::new(FileStore::new(&config.upload_dir));
    let app = build_app(pool, jwt_service, file_store);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
