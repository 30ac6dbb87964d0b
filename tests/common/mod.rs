//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use social_feed::config::Settings;
use social_feed::startup::{build_router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Test application backed by the in-memory store
pub struct TestApp {
    pub router: Router,
}

/// Status and decoded body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
    pub json: Value,
}

/// A registered account
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(Settings::in_memory(JWT_SECRET));
        Self {
            router: build_router(state),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse { status, text, json }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, None, Some(token)).await
    }

    pub async fn post_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::POST, uri, None, Some(token)).await
    }

    pub async fn post_json_auth(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn put_json_auth(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), Some(token)).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(token)).await
    }

    /// Register a fresh account and return its token
    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .post_json(
                "/api/auth/register",
                json!({
                    "name": format!("{} name", username),
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": TEST_PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);

        TestUser {
            id: response.json["user"]["id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            token: response.json["token"].as_str().unwrap().to_string(),
        }
    }

    /// Post a tweet and return its id
    pub async fn tweet(&self, user: &TestUser, body: Value) -> String {
        // Keep creation timestamps strictly increasing
        tokio::time::sleep(Duration::from_millis(2)).await;

        let response = self.post_json_auth("/api/tweets", body, &user.token).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json["tweet"]["id"].as_str().unwrap().to_string()
    }

    pub async fn follow(&self, follower: &TestUser, target: &TestUser) {
        let response = self
            .post_auth(&format!("/api/users/{}/follow", target.id), &follower.token)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    }
}

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Ids of the tweets in a list response, in order
pub fn tweet_ids(response: &TestResponse) -> Vec<String> {
    response.json["tweets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

/// Generate a unique username
pub fn unique_username() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}
