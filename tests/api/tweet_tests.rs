//! Tweet API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_tweet() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .post_json_auth(
            "/api/tweets",
            json!({ "content": "hello world", "media": "https://cdn/a.png" }),
            &alice.token,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let tweet = &response.json["tweet"];
    assert_eq!(response.json["success"], true);
    assert_eq!(tweet["content"], "hello world");
    assert_eq!(tweet["media"], "https://cdn/a.png");
    assert_eq!(tweet["author"]["username"], "alice");
    assert_eq!(tweet["author"]["id"], alice.id.as_str());
    assert_eq!(tweet["likesCount"], 0);
    assert_eq!(tweet["commentsCount"], 0);
    assert!(tweet["author"].get("email").is_none());
}

#[tokio::test]
async fn test_content_length_limits() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let at_limit = app
        .post_json_auth("/api/tweets", json!({ "content": "a".repeat(280) }), &alice.token)
        .await;
    assert_eq!(at_limit.status, StatusCode::CREATED);

    let over = app
        .post_json_auth("/api/tweets", json!({ "content": "a".repeat(281) }), &alice.token)
        .await;
    assert_eq!(over.status, StatusCode::BAD_REQUEST);
    assert_eq!(over.json["success"], false);
    assert_eq!(over.json["errors"][0]["field"], "content");

    let empty = app
        .post_json_auth("/api/tweets", json!({ "content": "" }), &alice.token)
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_uses_envelope() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .post_json_auth("/api/tweets", json!({ "text": "wrong field" }), &alice.token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["success"], false);
    assert!(response.json["message"].is_string());
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = TestApp::new();

    let missing = app.get("/api/tweets").await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json["success"], false);
    assert_eq!(missing.json["message"], "Not authorized, no token");

    let garbage = app.get_auth("/api/tweets", "not-a-jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.json["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_reply_to_missing_tweet() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .post_json_auth(
            "/api/tweets",
            json!({ "content": "reply", "replyToId": "123456" }),
            &alice.token,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_tweet_id() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app.get_auth("/api/tweets/not-an-id", &alice.token).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Invalid tweet id");
}

#[tokio::test]
async fn test_delete_tweet_author_only() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let tweet = app.tweet(&alice, json!({ "content": "mine" })).await;
    let uri = format!("/api/tweets/{}", tweet);

    let forbidden = app.delete_auth(&uri, &bob.token).await;
    assert_eq!(forbidden.status, StatusCode::UNAUTHORIZED);

    let deleted = app.delete_auth(&uri, &alice.token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json["message"], "Tweet deleted");

    let gone = app.get_auth(&uri, &alice.token).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pin_toggles() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let tweet = app.tweet(&alice, json!({ "content": "pin me" })).await;
    let uri = format!("/api/tweets/{}/pin", tweet);

    let pinned = app.post_auth(&uri, &alice.token).await;
    assert_eq!(pinned.json["tweet"]["pinned"], true);

    let unpinned = app.post_auth(&uri, &alice.token).await;
    assert_eq!(unpinned.json["tweet"]["pinned"], false);
}
