//! Interaction Annotator
//!
//! Decorates composed feed items with the viewer's interaction flags and
//! live counters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::instrument;

use super::feed_service::{AuthorSummary, FeedItem, ReplySummary};
use crate::domain::{TweetRepository, User};
use crate::shared::error::AppError;

/// Annotation trait for dependency injection
#[async_trait]
pub trait InteractionAnnotator: Send + Sync {
    /// Annotate every item for `viewer`. The output has the same length and
    /// order as `items`.
    async fn annotate(&self, items: &[FeedItem], viewer: &User) -> Result<Vec<TweetView>, AppError>;
}

/// A tweet as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: String,
    pub content: String,
    pub media: Option<String>,
    pub author: Option<AuthorSummary>,
    pub reply_to_id: Option<String>,
    pub reply_to_user: Option<ReplySummary>,
    pub retweet_of_id: Option<String>,
    pub pinned: bool,
    pub is_liked: bool,
    pub is_retweeted: bool,
    pub likes_count: usize,
    pub retweets_count: usize,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

impl TweetView {
    fn new(item: &FeedItem, viewer: &User, comments_count: i64) -> Self {
        let tweet = &item.tweet;
        Self {
            id: tweet.id.to_string(),
            content: tweet.content.clone(),
            media: tweet.media.clone(),
            author: item.author.clone(),
            reply_to_id: tweet.reply_to_id.map(|id| id.to_string()),
            reply_to_user: item.reply_parent_author.clone(),
            retweet_of_id: tweet.retweet_of_id.map(|id| id.to_string()),
            pinned: tweet.pinned,
            is_liked: tweet.is_liked_by(viewer.id),
            is_retweeted: tweet.is_retweeted_by(viewer.id),
            likes_count: tweet.liked_by.len(),
            retweets_count: tweet.retweeted_by.len(),
            comments_count,
            created_at: tweet.created_at,
        }
    }
}

/// InteractionAnnotator implementation
pub struct InteractionAnnotatorImpl<T>
where
    T: TweetRepository + ?Sized,
{
    tweet_repo: Arc<T>,
}

impl<T> InteractionAnnotatorImpl<T>
where
    T: TweetRepository + ?Sized,
{
    /// Create a new InteractionAnnotatorImpl
    pub fn new(tweet_repo: Arc<T>) -> Self {
        Self { tweet_repo }
    }
}

#[async_trait]
impl<T> InteractionAnnotator for InteractionAnnotatorImpl<T>
where
    T: TweetRepository + ?Sized + 'static,
{
    #[instrument(skip_all, fields(viewer_id = viewer.id, items = items.len()))]
    async fn annotate(&self, items: &[FeedItem], viewer: &User) -> Result<Vec<TweetView>, AppError> {
        // Comment counts are read live, never cached on the tweet
        let counts = try_join_all(
            items
                .iter()
                .map(|item| self.tweet_repo.count_replies(item.tweet.id)),
        )
        .await?;

        Ok(items
            .iter()
            .zip(counts)
            .map(|(item, count)| TweetView::new(item, viewer, count))
            .collect())
    }
}
