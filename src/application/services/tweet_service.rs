//! Tweet Service
//!
//! Creation, lookup, deletion and pinning of individual tweets.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::annotator::{InteractionAnnotator, InteractionAnnotatorImpl, TweetView};
use super::feed_service::preload;
use crate::domain::{Tweet, TweetRepository, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Tweet service trait for dependency injection
#[async_trait]
pub trait TweetService: Send + Sync {
    /// Post a new tweet or reply as `viewer`
    async fn create_tweet(&self, viewer: &User, new_tweet: NewTweet) -> Result<TweetView, AppError>;

    /// Get a single annotated tweet
    async fn get_tweet(&self, viewer: &User, tweet_id: i64) -> Result<TweetView, AppError>;

    /// Delete a tweet authored by `viewer`
    async fn delete_tweet(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError>;

    /// Flip the pinned flag of a tweet authored by `viewer`
    async fn toggle_pin(&self, viewer: &User, tweet_id: i64) -> Result<TweetView, AppError>;
}

/// Input for posting a tweet.
#[derive(Debug, Clone, Default)]
pub struct NewTweet {
    pub content: String,
    pub media: Option<String>,
    pub reply_to_id: Option<i64>,
}

/// TweetService implementation
pub struct TweetServiceImpl<T, U>
where
    T: TweetRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    tweet_repo: Arc<T>,
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<T, U> TweetServiceImpl<T, U>
where
    T: TweetRepository + ?Sized + 'static,
    U: UserRepository + ?Sized,
{
    /// Create a new TweetServiceImpl
    pub fn new(tweet_repo: Arc<T>, user_repo: Arc<U>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            tweet_repo,
            user_repo,
            id_generator,
        }
    }

    async fn require_tweet(&self, tweet_id: i64) -> Result<Tweet, AppError> {
        self.tweet_repo
            .find_by_id(tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".into()))
    }

    async fn require_own_tweet(&self, viewer: &User, tweet_id: i64, verb: &str) -> Result<Tweet, AppError> {
        let tweet = self.require_tweet(tweet_id).await?;
        if tweet.author_id != viewer.id {
            return Err(AppError::Unauthorized(format!(
                "You can only {} your own tweets",
                verb
            )));
        }
        Ok(tweet)
    }

    async fn view(&self, viewer: &User, tweet: Tweet) -> Result<TweetView, AppError> {
        let items = preload(self.tweet_repo.as_ref(), self.user_repo.as_ref(), vec![tweet]).await?;
        let annotator = InteractionAnnotatorImpl::new(self.tweet_repo.clone());
        annotator
            .annotate(&items, viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("annotation returned no tweet".into()))
    }
}

#[async_trait]
impl<T, U> TweetService for TweetServiceImpl<T, U>
where
    T: TweetRepository + ?Sized + 'static,
    U: UserRepository + ?Sized + 'static,
{
    #[instrument(skip(self, viewer, new_tweet), fields(viewer_id = viewer.id))]
    async fn create_tweet(&self, viewer: &User, new_tweet: NewTweet) -> Result<TweetView, AppError> {
        Tweet::validate_content(&new_tweet.content)?;

        if let Some(parent_id) = new_tweet.reply_to_id {
            if self.tweet_repo.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::NotFound("Reply target not found".into()));
            }
        }

        let tweet = Tweet::new(
            self.id_generator.generate(),
            viewer.id,
            new_tweet.content,
            new_tweet.media,
            new_tweet.reply_to_id,
        );
        let created = self.tweet_repo.create(&tweet).await?;
        tracing::info!(tweet_id = created.id, reply_to = ?created.reply_to_id, "Tweet created");

        self.view(viewer, created).await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn get_tweet(&self, viewer: &User, tweet_id: i64) -> Result<TweetView, AppError> {
        let tweet = self.require_tweet(tweet_id).await?;
        self.view(viewer, tweet).await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn delete_tweet(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError> {
        let tweet = self.require_own_tweet(viewer, tweet_id, "delete").await?;

        // Replies keep their reply_to_id; a dangling parent is tolerated
        if !self.tweet_repo.delete(tweet.id).await? {
            return Err(AppError::NotFound("Tweet not found".into()));
        }
        tracing::info!(tweet_id = tweet.id, "Tweet deleted");
        Ok(())
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn toggle_pin(&self, viewer: &User, tweet_id: i64) -> Result<TweetView, AppError> {
        let mut tweet = self.require_own_tweet(viewer, tweet_id, "pin").await?;
        tweet.pinned = !tweet.pinned;
        self.tweet_repo.set_pinned(tweet.id, tweet.pinned).await?;
        self.view(viewer, tweet).await
    }
}
