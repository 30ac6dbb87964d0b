//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::{NewTweet, Registration, UserListQuery, UserListType};
use crate::domain::{FeedParams, FeedType, Pagination, ProfileUpdate};
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 30, message = "Username must be 2-30 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(body: RegisterRequest) -> Self {
        Self {
            name: body.name,
            username: body.username,
            email: body.email,
            password: body.password,
        }
    }
}

/// Create tweet request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTweetRequest {
    #[validate(length(min = 1, max = 280, message = "Content must be 1-280 characters"))]
    pub content: String,

    pub media: Option<String>,

    pub reply_to_id: Option<String>,
}

impl CreateTweetRequest {
    pub fn into_new_tweet(self) -> Result<NewTweet, AppError> {
        let reply_to_id = self
            .reply_to_id
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_id("replyToId", raw))
            .transpose()?;

        Ok(NewTweet {
            content: self.content,
            media: self.media,
            reply_to_id,
        })
    }
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 160, message = "Bio must be at most 160 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 30, message = "Location must be at most 30 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 100, message = "Website must be at most 100 characters"))]
    pub website: Option<String>,

    pub profile_image: Option<String>,

    pub cover_image: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(body: UpdateProfileRequest) -> Self {
        Self {
            name: body.name,
            bio: body.bio,
            location: body.location,
            website: body.website,
            profile_image: body.profile_image,
            cover_image: body.cover_image,
        }
    }
}

/// `GET /tweets` query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub username: Option<String>,
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub feed_type: Option<String>,
    pub reply_to_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl FeedQuery {
    pub fn into_params(self, default_limit: u32) -> Result<FeedParams, AppError> {
        let feed_type = non_blank(self.feed_type)
            .map(|raw| raw.parse::<FeedType>())
            .transpose()?;
        let reply_to_id = non_blank(self.reply_to_id)
            .map(|raw| parse_id("replyToId", &raw))
            .transpose()?;

        Ok(FeedParams {
            username: self.username,
            search_query: self.query,
            feed_type,
            reply_to_id,
            pagination: Pagination::from_query(self.page, self.limit, default_limit)?,
        })
    }
}

/// `GET /users` query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub list_type: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl UserListParams {
    pub fn into_query(self, default_limit: u32) -> Result<UserListQuery, AppError> {
        let list_type = non_blank(self.list_type)
            .map(|raw| raw.parse::<UserListType>())
            .transpose()?;
        let user_id = non_blank(self.user_id)
            .map(|raw| parse_id("userId", &raw))
            .transpose()?;

        Ok(UserListQuery {
            search: self.query,
            list_type,
            user_id,
            pagination: Pagination::from_query(self.page, self.limit, default_limit)?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
