//! Response DTOs
//!
//! Success envelopes for API response bodies. Failures are rendered by
//! [`AppError`](crate::shared::error::AppError).

use serde::Serialize;

use crate::application::services::{TweetView, UserView};
use crate::domain::Pagination;

/// Registration and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserView,
}

impl AuthResponse {
    pub fn new(token: String, user: UserView) -> Self {
        Self {
            success: true,
            token,
            user,
        }
    }
}

/// Single tweet response
#[derive(Debug, Serialize)]
pub struct TweetResponse {
    pub success: bool,
    pub tweet: TweetView,
}

impl From<TweetView> for TweetResponse {
    fn from(tweet: TweetView) -> Self {
        Self {
            success: true,
            tweet,
        }
    }
}

/// Page of tweets
#[derive(Debug, Serialize)]
pub struct TweetListResponse {
    pub success: bool,
    pub tweets: Vec<TweetView>,
    pub page: u32,
    pub limit: u32,
}

impl TweetListResponse {
    pub fn new(tweets: Vec<TweetView>, pagination: Pagination) -> Self {
        Self {
            success: true,
            tweets,
            page: pagination.page(),
            limit: pagination.limit(),
        }
    }
}

/// Single user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserView,
}

impl From<UserView> for UserResponse {
    fn from(user: UserView) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Page of users
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl UserListResponse {
    pub fn page(users: Vec<UserView>, pagination: Pagination) -> Self {
        Self {
            success: true,
            users,
            page: Some(pagination.page()),
            limit: Some(pagination.limit()),
        }
    }

    pub fn unpaged(users: Vec<UserView>) -> Self {
        Self {
            success: true,
            users,
            page: None,
            limit: None,
        }
    }
}

/// Acknowledgement with a human-readable message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
