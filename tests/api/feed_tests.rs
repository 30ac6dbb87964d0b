//! Feed API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{tweet_ids, TestApp};

#[tokio::test]
async fn test_home_timeline_excludes_replies_and_strangers() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;
    app.follow(&viewer, &alice).await;
    app.follow(&viewer, &bob).await;

    let x = app.tweet(&carol, json!({ "content": "root" })).await;
    let t1 = app.tweet(&alice, json!({ "content": "first" })).await;
    app.tweet(&bob, json!({ "content": "a reply", "replyToId": x }))
        .await;
    let t3 = app.tweet(&alice, json!({ "content": "third" })).await;

    let response = app.get_auth("/api/tweets", &viewer.token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(tweet_ids(&response), vec![t3, t1]);
    assert_eq!(response.json["page"], 1);
    assert_eq!(response.json["limit"], 10);
}

#[tokio::test]
async fn test_home_timeline_includes_own_tweets() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;
    let mine = app.tweet(&viewer, json!({ "content": "mine" })).await;

    let response = app.get_auth("/api/tweets", &viewer.token).await;
    assert_eq!(tweet_ids(&response), vec![mine]);
}

#[tokio::test]
async fn test_media_feed_ignores_follow_graph() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;
    let stranger = app.register("stranger").await;

    app.tweet(&viewer, json!({ "content": "text only" })).await;
    let with_media = app
        .tweet(&stranger, json!({ "content": "look", "media": "https://cdn/img.png" }))
        .await;
    app.tweet(&stranger, json!({ "content": "blank media", "media": "" }))
        .await;

    let response = app.get_auth("/api/tweets?type=media", &viewer.token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(tweet_ids(&response), vec![with_media]);
}

#[tokio::test]
async fn test_pagination_over_author_timeline() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;
    let author = app.register("author").await;

    let mut posted = Vec::new();
    for i in 0..25 {
        posted.push(app.tweet(&author, json!({ "content": format!("tweet {}", i) })).await);
    }
    posted.reverse();

    let page_two = app
        .get_auth("/api/tweets?username=author&page=2&limit=10", &viewer.token)
        .await;
    assert_eq!(page_two.status, StatusCode::OK);
    assert_eq!(tweet_ids(&page_two), posted[10..20].to_vec());

    let beyond = app
        .get_auth("/api/tweets?username=author&page=4&limit=10", &viewer.token)
        .await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert!(tweet_ids(&beyond).is_empty());
}

#[tokio::test]
async fn test_comments_count_is_live() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let parent = app.tweet(&alice, json!({ "content": "parent" })).await;
    let uri = format!("/api/tweets/{}", parent);

    assert_eq!(app.get_auth(&uri, &alice.token).await.json["tweet"]["commentsCount"], 0);

    app.tweet(&bob, json!({ "content": "reply", "replyToId": parent }))
        .await;
    assert_eq!(app.get_auth(&uri, &alice.token).await.json["tweet"]["commentsCount"], 1);

    app.tweet(&alice, json!({ "content": "reply 2", "replyToId": parent }))
        .await;
    assert_eq!(app.get_auth(&uri, &alice.token).await.json["tweet"]["commentsCount"], 2);
}

#[tokio::test]
async fn test_replies_to_tweet_carry_parent_author() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let parent = app.tweet(&alice, json!({ "content": "parent" })).await;
    let reply = app
        .tweet(&bob, json!({ "content": "reply", "replyToId": parent }))
        .await;
    app.tweet(&bob, json!({ "content": "unrelated" })).await;

    let response = app
        .get_auth(&format!("/api/tweets?replyToId={}", parent), &alice.token)
        .await;

    assert_eq!(tweet_ids(&response), vec![reply]);
    let tweet = &response.json["tweets"][0];
    assert_eq!(tweet["replyToUser"]["username"], "alice");
    assert_eq!(tweet["author"]["username"], "bob");
}

#[tokio::test]
async fn test_likes_feed_in_like_order() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;
    let author = app.register("author").await;
    let first = app.tweet(&author, json!({ "content": "one" })).await;
    let second = app.tweet(&author, json!({ "content": "two" })).await;

    for id in [&second, &first] {
        let liked = app
            .post_auth(&format!("/api/tweets/{}/like", id), &viewer.token)
            .await;
        assert_eq!(liked.status, StatusCode::OK);
    }

    let response = app
        .get_auth("/api/tweets?type=likes&username=viewer", &viewer.token)
        .await;

    // Most recently liked first, regardless of tweet age
    assert_eq!(tweet_ids(&response), vec![first, second]);
    assert!(response.json["tweets"][0]["isLiked"].as_bool().unwrap());
}

#[tokio::test]
async fn test_author_timeline_for_unknown_user() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;

    let response = app.get_auth("/api/tweets?username=ghost", &viewer.token).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json["success"], false);
}

#[tokio::test]
async fn test_search_matches_content() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;
    let author = app.register("author").await;
    let hit = app.tweet(&author, json!({ "content": "Rust is great" })).await;
    app.tweet(&author, json!({ "content": "something else" })).await;

    let response = app.get_auth("/api/tweets?query=rust", &viewer.token).await;

    assert_eq!(tweet_ids(&response), vec![hit]);
}

#[tokio::test]
async fn test_invalid_feed_params() {
    let app = TestApp::new();
    let viewer = app.register("viewer").await;

    let bad_type = app.get_auth("/api/tweets?type=bookmarks", &viewer.token).await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_type.json["errors"][0]["field"], "type");

    let zero_limit = app.get_auth("/api/tweets?limit=0", &viewer.token).await;
    assert_eq!(zero_limit.status, StatusCode::BAD_REQUEST);

    let not_a_number = app.get_auth("/api/tweets?page=abc", &viewer.token).await;
    assert_eq!(not_a_number.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_a_number.json["success"], false);
}
