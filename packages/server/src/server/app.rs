//! Application setup and server configuration.
//!
//! Every protected route is bound to exactly one required permission here,
//! at registration time. The `:id` mutation routes additionally carry the
//! ownership guard; guards run outermost-first, so the order is always
//! authenticate -> authorize -> own -> handler.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::{JwtService, Permission};
use crate::domains::documents::FileStore;
use crate::server::middleware::{authorize, verify_ownership};
use crate::server::routes::{
    admin_stats, check_document_freshness, delete_document, health_handler, list_documents,
    list_my_documents, login, register, search_documents_by_tags, update_document,
    upload_document,
};

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub file_store: Arc<FileStore>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, jwt_service: Arc<JwtService>, file_store: Arc<FileStore>) -> Router {
    let state = AppState {
        db_pool: pool,
        jwt_service,
        file_store,
    };

    // Per-route permission guards, bound at registration time
    let upload_guard = {
        let state = state.clone();
        middleware::from_fn(move |req, next| {
            authorize(state.clone(), Permission::UploadDocument, req, next)
        })
    };
    let read_guard = {
        let state = state.clone();
        middleware::from_fn(move |req, next| {
            authorize(state.clone(), Permission::ReadDocument, req, next)
        })
    };
    let update_guard = {
        let state = state.clone();
        middleware::from_fn(move |req, next| {
            authorize(state.clone(), Permission::UpdateDocument, req, next)
        })
    };
    let delete_guard = {
        let state = state.clone();
        middleware::from_fn(move |req, next| {
            authorize(state.clone(), Permission::DeleteDocument, req, next)
        })
    };
    let admin_guard = {
        let state = state.clone();
        middleware::from_fn(move |req, next| {
            authorize(state.clone(), Permission::ManageUsers, req, next)
        })
    };
    let ownership_guard = {
        let state = state.clone();
        middleware::from_fn(move |req, next| verify_ownership(state.clone(), req, next))
    };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        // Public routes
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/health", get(health_handler))
        .route("/documents/:id/freshness", get(check_document_freshness))
        // Permission-guarded routes
        .route(
            "/documents",
            post(upload_document).route_layer(upload_guard),
        )
        .route(
            "/documents",
            get(list_documents).route_layer(read_guard.clone()),
        )
        .route(
            "/documents/mine",
            get(list_my_documents).route_layer(read_guard.clone()),
        )
        .route(
            "/documents/search",
            get(search_documents_by_tags).route_layer(read_guard),
        )
        // Permission + ownership guarded routes; guards added last run
        // first, so authorize wraps ownership
        .route(
            "/documents/:id",
            put(update_document)
                .route_layer(ownership_guard.clone())
                .route_layer(update_guard),
        )
        .route(
            "/documents/:id",
            delete(delete_document)
                .route_layer(ownership_guard)
                .route_layer(delete_guard),
        )
        .route("/admin/stats", get(admin_stats).route_layer(admin_guard))
        // Shared layers
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
