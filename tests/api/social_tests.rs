//! Like, Retweet and Follow API Tests

use axum::http::StatusCode;
use serde_json::json;
use test_case::test_case;

use crate::common::TestApp;

#[tokio::test]
async fn test_like_then_unlike_restores_state() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let tweet = app.tweet(&alice, json!({ "content": "like me" })).await;
    let uri = format!("/api/tweets/{}", tweet);

    let liked = app.post_auth(&format!("{}/like", uri), &bob.token).await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.json["success"], true);

    let view = app.get_auth(&uri, &bob.token).await.json;
    assert_eq!(view["tweet"]["likesCount"], 1);
    assert_eq!(view["tweet"]["isLiked"], true);

    // Another viewer sees the count but not the flag
    let view = app.get_auth(&uri, &alice.token).await.json;
    assert_eq!(view["tweet"]["isLiked"], false);

    let unliked = app.post_auth(&format!("{}/unlike", uri), &bob.token).await;
    assert_eq!(unliked.status, StatusCode::OK);

    let view = app.get_auth(&uri, &bob.token).await.json;
    assert_eq!(view["tweet"]["likesCount"], 0);
    assert_eq!(view["tweet"]["isLiked"], false);
}

#[test_case("like", "unlike", "Tweet already liked", "Tweet not liked yet" ; "likes")]
#[test_case("retweet", "unretweet", "Tweet already retweeted", "Tweet not retweeted yet" ; "retweets")]
#[tokio::test]
async fn test_repeated_actions_conflict(
    action: &str,
    undo: &str,
    already: &str,
    not_yet: &str,
) {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let tweet = app.tweet(&alice, json!({ "content": "hello" })).await;

    let undo_first = app
        .post_auth(&format!("/api/tweets/{}/{}", tweet, undo), &alice.token)
        .await;
    assert_eq!(undo_first.status, StatusCode::BAD_REQUEST);
    assert_eq!(undo_first.json["message"], not_yet);

    let first = app
        .post_auth(&format!("/api/tweets/{}/{}", tweet, action), &alice.token)
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .post_auth(&format!("/api/tweets/{}/{}", tweet, action), &alice.token)
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.json["success"], false);
    assert_eq!(second.json["message"], already);
}

#[tokio::test]
async fn test_retweet_sets_flag_and_count() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let tweet = app.tweet(&alice, json!({ "content": "share me" })).await;

    app.post_auth(&format!("/api/tweets/{}/retweet", tweet), &bob.token)
        .await;

    let view = app
        .get_auth(&format!("/api/tweets/{}", tweet), &bob.token)
        .await
        .json;
    assert_eq!(view["tweet"]["retweetsCount"], 1);
    assert_eq!(view["tweet"]["isRetweeted"], true);
}

#[tokio::test]
async fn test_like_missing_tweet() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app.post_auth("/api/tweets/987654321/like", &alice.token).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json["message"], "Tweet not found");
}

#[tokio::test]
async fn test_follow_updates_both_sides() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    app.follow(&alice, &bob).await;

    let own = app.get_auth("/api/users/profile", &alice.token).await.json;
    assert_eq!(own["user"]["followingCount"], 1);

    let target = app.get_auth("/api/users/profile/bob", &alice.token).await.json;
    assert_eq!(target["user"]["followersCount"], 1);
    assert_eq!(target["user"]["isFollowing"], true);

    let again = app
        .post_auth(&format!("/api/users/{}/follow", bob.id), &alice.token)
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.json["message"], "You are already following this user");

    let unfollowed = app
        .post_auth(&format!("/api/users/{}/unfollow", bob.id), &alice.token)
        .await;
    assert_eq!(unfollowed.status, StatusCode::OK);

    let target = app.get_auth("/api/users/profile/bob", &alice.token).await.json;
    assert_eq!(target["user"]["followersCount"], 0);
    assert_eq!(target["user"]["isFollowing"], false);
}

#[tokio::test]
async fn test_unfollow_without_follow() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let response = app
        .post_auth(&format!("/api/users/{}/unfollow", bob.id), &alice.token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "You are not following this user");
}

#[test_case("follow" ; "follow")]
#[test_case("unfollow" ; "unfollow")]
#[tokio::test]
async fn test_self_follow_is_invalid(action: &str) {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .post_auth(&format!("/api/users/{}/{}", alice.id, action), &alice.token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json["message"],
        format!("You cannot {} yourself", action)
    );
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app.post_auth("/api/users/123456789/follow", &alice.token).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
