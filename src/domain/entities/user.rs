//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Pagination;
use crate::shared::error::AppError;

/// Represents a user account and its side of the follow graph.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(50) NOT NULL
/// - username: VARCHAR(30) NOT NULL UNIQUE
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - bio, location, website, profile_image, cover_image: TEXT NULL
/// - following_ids, followers_ids: BIGINT[] NOT NULL DEFAULT '{}'
/// - liked_tweet_ids, retweeted_tweet_ids: BIGINT[] NOT NULL DEFAULT '{}'
/// - created_at, updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// All id arrays are ordered most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Display name
    pub name: String,

    /// Username (unique)
    pub username: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,

    /// Users this user follows
    pub following_ids: Vec<i64>,

    /// Users following this user
    pub followers_ids: Vec<i64>,

    /// Tweets this user liked
    pub liked_tweet_ids: Vec<i64>,

    /// Tweets this user retweeted
    pub retweeted_tweet_ids: Vec<i64>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user with empty relations.
    pub fn new(id: i64, name: String, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            username,
            email,
            password_hash,
            bio: None,
            location: None,
            website: None,
            profile_image: None,
            cover_image: None,
            following_ids: Vec::new(),
            followers_ids: Vec::new(),
            liked_tweet_ids: Vec::new(),
            retweeted_tweet_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_following(&self, user_id: i64) -> bool {
        self.following_ids.contains(&user_id)
    }

    /// Author ids that make up this user's home timeline.
    pub fn timeline_author_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(self.following_ids.len() + 1);
        ids.push(self.id);
        ids.extend(self.following_ids.iter().copied().filter(|id| *id != self.id));
        ids
    }
}

/// Membership sets stored on a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSet {
    Following,
    Followers,
    LikedTweets,
    RetweetedTweets,
}

impl UserSet {
    /// Column holding the set.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Following => "following_ids",
            Self::Followers => "followers_ids",
            Self::LikedTweets => "liked_tweet_ids",
            Self::RetweetedTweets => "retweeted_tweet_ids",
        }
    }

    /// Borrow the set from a user.
    pub fn of<'a>(&self, user: &'a User) -> &'a Vec<i64> {
        match self {
            Self::Following => &user.following_ids,
            Self::Followers => &user.followers_ids,
            Self::LikedTweets => &user.liked_tweet_ids,
            Self::RetweetedTweets => &user.retweeted_tweet_ids,
        }
    }

    /// Mutably borrow the set from a user.
    pub fn of_mut<'a>(&self, user: &'a mut User) -> &'a mut Vec<i64> {
        match self {
            Self::Following => &mut user.following_ids,
            Self::Followers => &mut user.followers_ids,
            Self::LikedTweets => &mut user.liked_tweet_ids,
            Self::RetweetedTweets => &mut user.retweeted_tweet_ids,
        }
    }
}

/// Profile fields a user may edit. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
}

impl ProfileUpdate {
    /// Apply the update to a user in memory.
    pub fn apply(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name = name.clone();
        }
        if let Some(ref bio) = self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(ref location) = self.location {
            user.location = Some(location.clone());
        }
        if let Some(ref website) = self.website {
            user.website = Some(website.clone());
        }
        if let Some(ref image) = self.profile_image {
            user.profile_image = Some(image.clone());
        }
        if let Some(ref image) = self.cover_image {
            user.cover_image = Some(image.clone());
        }
        user.updated_at = Utc::now();
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual store interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find users by ID. Missing ids are skipped; order is unspecified.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Check if a username is already taken.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Create a new user.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update profile fields. Returns None if the user does not exist.
    async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Option<User>, AppError>;

    /// Atomically insert `value` at the front of a set if absent.
    ///
    /// Returns true if the set changed.
    async fn add_to_set(&self, id: i64, set: UserSet, value: i64) -> Result<bool, AppError>;

    /// Atomically remove `value` from a set.
    ///
    /// Returns true if the set changed.
    async fn remove_from_set(&self, id: i64, set: UserSet, value: i64) -> Result<bool, AppError>;

    /// Search users by name or username (case-insensitive), newest first.
    async fn search(&self, query: Option<String>, pagination: Pagination) -> Result<Vec<User>, AppError>;

    /// Newest users whose id is not in `exclude`.
    async fn suggestions(&self, exclude: &[i64], limit: u32) -> Result<Vec<User>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(
            1,
            "Test User".to_string(),
            "testuser".to_string(),
            "test@example.com".to_string(),
            "hashed_password".to_string(),
        )
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = create_test_user();
        let serialized = serde_json::to_string(&user).expect("Failed to serialize user");

        assert!(!serialized.contains("passwordHash"));
        assert!(!serialized.contains("hashed_password"));
        assert!(serialized.contains("\"followingIds\":[]"));
    }

    #[test]
    fn test_timeline_author_ids_includes_self_first() {
        let mut user = create_test_user();
        user.following_ids = vec![3, 2];

        assert_eq!(user.timeline_author_ids(), vec![1, 3, 2]);
    }

    #[test]
    fn test_profile_update_only_touches_given_fields() {
        let mut user = create_test_user();
        user.bio = Some("old".into());

        ProfileUpdate {
            location: Some("Lisbon".into()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.bio.as_deref(), Some("old"));
        assert_eq!(user.location.as_deref(), Some("Lisbon"));
        assert_eq!(user.name, "Test User");
    }

    #[test]
    fn test_user_set_accessors() {
        let mut user = create_test_user();
        UserSet::Followers.of_mut(&mut user).push(9);

        assert_eq!(UserSet::Followers.of(&user), &vec![9]);
        assert_eq!(UserSet::LikedTweets.column(), "liked_tweet_ids");
    }
}
