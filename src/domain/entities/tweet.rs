//! Tweet entity and repository trait.
//!
//! Maps to the `tweets` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Pagination, ReplyFilter};
use crate::shared::error::AppError;

/// Maximum tweet length in characters.
pub const MAX_TWEET_LENGTH: usize = 280;

/// Represents a short post.
///
/// Maps to the `tweets` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - author_id: BIGINT NOT NULL REFERENCES users(id)
/// - content: VARCHAR(280) NOT NULL
/// - media: TEXT NULL
/// - liked_by: BIGINT[] NOT NULL DEFAULT '{}' (most recent first)
/// - retweeted_by: BIGINT[] NOT NULL DEFAULT '{}' (most recent first)
/// - reply_to_id: BIGINT NULL (not a foreign key, parents may be deleted)
/// - retweet_of_id: BIGINT NULL
/// - pinned: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Author user ID
    pub author_id: i64,

    /// Text content (1-280 characters)
    pub content: String,

    /// Opaque media reference
    pub media: Option<String>,

    /// Users who liked this tweet, most recent first
    pub liked_by: Vec<i64>,

    /// Users who retweeted this tweet, most recent first
    pub retweeted_by: Vec<i64>,

    /// Parent tweet when this is a reply
    pub reply_to_id: Option<i64>,

    /// Original tweet when this is a retweet wrapper
    pub retweet_of_id: Option<i64>,

    /// Whether the author pinned this tweet
    pub pinned: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    /// Create a new top-level tweet or reply.
    ///
    /// An empty media reference is stored as no media.
    pub fn new(
        id: i64,
        author_id: i64,
        content: String,
        media: Option<String>,
        reply_to_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            author_id,
            content,
            media: media.filter(|m| !m.trim().is_empty()),
            liked_by: Vec::new(),
            retweeted_by: Vec::new(),
            reply_to_id,
            retweet_of_id: None,
            pinned: false,
            created_at: Utc::now(),
        }
    }

    /// Check the content length bounds.
    pub fn validate_content(content: &str) -> Result<(), AppError> {
        let len = content.chars().count();
        if len == 0 || len > MAX_TWEET_LENGTH {
            return Err(AppError::invalid_field(
                "content",
                format!("Content must be 1-{} characters", MAX_TWEET_LENGTH),
            ));
        }
        Ok(())
    }

    /// Check if this tweet carries a media reference.
    pub fn has_media(&self) -> bool {
        self.media.as_deref().is_some_and(|m| !m.is_empty())
    }

    pub fn is_liked_by(&self, user_id: i64) -> bool {
        self.liked_by.contains(&user_id)
    }

    pub fn is_retweeted_by(&self, user_id: i64) -> bool {
        self.retweeted_by.contains(&user_id)
    }
}

/// Membership sets stored on a tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweetSet {
    LikedBy,
    RetweetedBy,
}

impl TweetSet {
    /// Column holding the set.
    pub fn column(&self) -> &'static str {
        match self {
            Self::LikedBy => "liked_by",
            Self::RetweetedBy => "retweeted_by",
        }
    }

    /// Borrow the set from a tweet.
    pub fn of<'a>(&self, tweet: &'a Tweet) -> &'a Vec<i64> {
        match self {
            Self::LikedBy => &tweet.liked_by,
            Self::RetweetedBy => &tweet.retweeted_by,
        }
    }

    /// Mutably borrow the set from a tweet.
    pub fn of_mut<'a>(&self, tweet: &'a mut Tweet) -> &'a mut Vec<i64> {
        match self {
            Self::LikedBy => &mut tweet.liked_by,
            Self::RetweetedBy => &mut tweet.retweeted_by,
        }
    }
}

/// Store-level predicate for `find_many`.
///
/// All present conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetFilter {
    /// Restrict to these authors
    pub author_ids: Option<Vec<i64>>,

    /// Case-insensitive substring of the content
    pub content_contains: Option<String>,

    /// Only tweets with a media reference
    pub media_only: bool,

    /// Reply handling
    pub replies: ReplyFilter,
}

impl TweetFilter {
    /// Evaluate the predicate against a tweet in memory.
    pub fn matches(&self, tweet: &Tweet) -> bool {
        if let Some(ref authors) = self.author_ids {
            if !authors.contains(&tweet.author_id) {
                return false;
            }
        }

        if let Some(ref query) = self.content_contains {
            if !tweet
                .content
                .to_lowercase()
                .contains(&query.to_lowercase())
            {
                return false;
            }
        }

        if self.media_only && !tweet.has_media() {
            return false;
        }

        match self.replies {
            ReplyFilter::TopLevelOnly => tweet.reply_to_id.is_none(),
            ReplyFilter::RepliesTo(parent) => tweet.reply_to_id == Some(parent),
            ReplyFilter::Any => true,
        }
    }
}

/// Repository trait for Tweet data access operations.
///
/// Set mutations are atomic at the store: implementations must never read a
/// whole set, modify it in memory and write it back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TweetRepository: Send + Sync {
    /// Find a tweet by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Tweet>, AppError>;

    /// Find tweets by ID. Missing ids are skipped; order is unspecified.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Tweet>, AppError>;

    /// Find tweets matching a filter, newest first, paginated.
    ///
    /// Ties on `created_at` follow storage order, which is not guaranteed to
    /// be stable across runs.
    async fn find_many(
        &self,
        filter: &TweetFilter,
        pagination: Pagination,
    ) -> Result<Vec<Tweet>, AppError>;

    /// Count tweets replying to the given tweet.
    async fn count_replies(&self, tweet_id: i64) -> Result<i64, AppError>;

    /// Insert a new tweet.
    async fn create(&self, tweet: &Tweet) -> Result<Tweet, AppError>;

    /// Hard delete a tweet. Returns false if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically insert `user_id` at the front of a set if absent.
    ///
    /// Returns true if the set changed.
    async fn add_to_set(&self, id: i64, set: TweetSet, user_id: i64) -> Result<bool, AppError>;

    /// Atomically remove `user_id` from a set.
    ///
    /// Returns true if the set changed.
    async fn remove_from_set(
        &self,
        id: i64,
        set: TweetSet,
        user_id: i64,
    ) -> Result<bool, AppError>;

    /// Set the pinned flag.
    async fn set_pinned(&self, id: i64, pinned: bool) -> Result<(), AppError>;
}
