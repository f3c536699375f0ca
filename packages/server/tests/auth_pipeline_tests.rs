//! End-to-end tests for the authenticate -> authorize pipeline.
//!
//! Covers rejection at stage 1 (missing/malformed/expired/forged tokens),
//! rejection at stage 2 (valid identity lacking the bound permission), and
//! the full register -> login -> request happy path.

mod common;

use common::{fixtures, json_request, send, test_app, TEST_JWT_ISSUER, TEST_JWT_SECRET};

use archiv_core::domains::auth::Claims;
use axum::http::StatusCode;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, json_request("GET", "/documents", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "Unauthorized");
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let (app, _pool) = test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/documents")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_401() {
    let (app, pool) = test_app().await;
    let user = fixtures::create_user(&pool, "user").await;

    // Signed with the wrong secret
    let claims = Claims {
        user_id: user.id,
        role_name: "user".to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        iat: chrono::Utc::now().timestamp(),
        iss: TEST_JWT_ISSUER.to_string(),
    };
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let (status, _) = send(&app, json_request("GET", "/documents", Some(&forged), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_401_and_handler_never_runs() {
    let (app, pool) = test_app().await;
    let user = fixtures::create_user(&pool, "user").await;

    let claims = Claims {
        user_id: user.id,
        role_name: "user".to_string(),
        exp: (chrono::Utc::now() - chrono::Duration::minutes(5)).timestamp(),
        iat: (chrono::Utc::now() - chrono::Duration::hours(25)).timestamp(),
        iss: TEST_JWT_ISSUER.to_string(),
    };
    let expired = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = send(
        &app,
        json_request("GET", "/documents", Some(&expired), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn user_without_delete_permission_is_403() {
    // Scenario: role "user" holds {read_document, upload_document}; a
    // delete attempt must fail at the permission stage, not ownership
    let (app, pool) = test_app().await;
    let alice = fixtures::create_user(&pool, "user").await;
    let document_id = fixtures::create_document(&pool, alice.id, "alice-notes.txt").await;

    let token = common::test_jwt_service().issue(alice.id, "user").unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/documents/{}", document_id),
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Permission 'delete_document' required");
}

#[tokio::test]
async fn user_with_read_permission_can_list() {
    let (app, pool) = test_app().await;
    let user = fixtures::create_user(&pool, "user").await;
    let token = common::test_jwt_service().issue(user.id, "user").unwrap();

    let (status, body) = send(&app, json_request("GET", "/documents", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["documents"].is_array());
}

#[tokio::test]
async fn register_login_and_request_round_trip() {
    let (app, _pool) = test_app().await;
    let username = format!("round-trip-{}", Uuid::new_v4());

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": username, "password": "a-long-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": "a-long-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, json_request("GET", "/documents", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_failure_detail_is_uniform() {
    let (app, pool) = test_app().await;
    let user = fixtures::create_user(&pool, "user").await;

    // Wrong password for an existing user
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": user.username, "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_password_message = body["message"].clone();

    // Unknown user
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": format!("nobody-{}", Uuid::new_v4()), "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], wrong_password_message);
}

#[tokio::test]
async fn registration_validation_carries_details() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": "", "password": "short" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}
