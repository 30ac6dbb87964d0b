//! Authentication API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{unique_username, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_with_valid_data() {
    let app = TestApp::new();
    let username = unique_username();

    let response = app
        .post_json(
            "/api/auth/register",
            json!({
                "name": "Test User",
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json["success"], true);
    assert!(response.json["token"].is_string());
    assert_eq!(response.json["user"]["username"], username.as_str());
    assert_eq!(response.json["user"]["followersCount"], 0);
    assert!(!response.text.contains("argon2"));
}

#[tokio::test]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/auth/register",
            json!({
                "name": "Test User",
                "username": "tester",
                "email": "not-an-email",
                "password": TEST_PASSWORD,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_register_with_short_password_fails() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/auth/register",
            json!({
                "name": "Test User",
                "username": "tester",
                "email": "tester@example.com",
                "password": "short",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["errors"][0]["field"], "password");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    app.register("tester").await;

    let response = app
        .post_json(
            "/api/auth/register",
            json!({
                "name": "Other",
                "username": "other",
                "email": "tester@example.com",
                "password": TEST_PASSWORD,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Email already exists");
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new();
    let user = app.register("tester").await;

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "email": "tester@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["user"]["id"], user.id.as_str());

    let token = response.json["token"].as_str().unwrap();
    let me = app.get_auth("/api/users/profile", token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json["user"]["username"], "tester");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.register("tester").await;

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "email": "tester@example.com", "password": "wrong-password" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["message"], "Invalid email or password");
}
