//! User API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

fn usernames(body: &Value) -> Vec<String> {
    body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_email_only_on_own_profile() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.register("bob").await;

    let own = app.get_auth("/api/users/profile", &alice.token).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.json["user"]["email"], "alice@example.com");

    let other = app.get_auth("/api/users/profile/bob", &alice.token).await;
    assert_eq!(other.status, StatusCode::OK);
    assert!(other.json["user"].get("email").is_none());
    assert!(other.json["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_unknown_profile() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app.get_auth("/api/users/profile/nobody", &alice.token).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .put_json_auth(
            "/api/users/profile",
            json!({ "bio": "Rustacean", "location": "Berlin" }),
            &alice.token,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["user"]["bio"], "Rustacean");
    assert_eq!(response.json["user"]["location"], "Berlin");
    assert_eq!(response.json["user"]["name"], "alice name");

    let too_long = app
        .put_json_auth("/api/users/profile", json!({ "bio": "x".repeat(161) }), &alice.token)
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_long.json["errors"][0]["field"], "bio");
}

#[tokio::test]
async fn test_followers_and_following_lists() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;
    app.follow(&bob, &alice).await;
    app.follow(&carol, &alice).await;
    app.follow(&alice, &carol).await;

    let followers = app
        .get_auth(
            &format!("/api/users?type=followers&userId={}", alice.id),
            &bob.token,
        )
        .await;
    assert_eq!(followers.status, StatusCode::OK);
    // Most recent follower first
    assert_eq!(usernames(&followers.json), vec!["carol", "bob"]);

    let following = app.get_auth("/api/users?type=following", &alice.token).await;
    assert_eq!(usernames(&following.json), vec!["carol"]);
    assert_eq!(following.json["users"][0]["isFollowing"], true);
}

#[tokio::test]
async fn test_search_users() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.register("bob").await;
    app.register("bobby").await;

    let response = app.get_auth("/api/users?query=BOB", &alice.token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(usernames(&response.json), vec!["bobby", "bob"]);
    assert_eq!(response.json["page"], 1);
}

#[tokio::test]
async fn test_suggestions_exclude_self_and_followed() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    app.register("carol").await;
    app.follow(&alice, &bob).await;

    let response = app.get_auth("/api/users/suggestions", &alice.token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(usernames(&response.json), vec!["carol"]);
}

#[tokio::test]
async fn test_unknown_list_type() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app.get_auth("/api/users?type=friends", &alice.token).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["errors"][0]["field"], "type");
}
