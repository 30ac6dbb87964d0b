//! Feed Composer
//!
//! Turns a feed request into an ordered, paginated page of tweets with their
//! authors and reply-parent authors preloaded.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use crate::domain::{
    FeedParams, FeedScope, Pagination, ReplyFilter, Tweet, TweetFilter, TweetRepository, User,
    UserRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Feed composition trait for dependency injection
#[async_trait]
pub trait FeedComposer: Send + Sync {
    /// Compose one page of the feed described by `params`, as seen by `viewer`.
    async fn compose_query(
        &self,
        viewer: &User,
        params: &FeedParams,
    ) -> Result<Vec<FeedItem>, AppError>;
}

/// Public author fields embedded in a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_image: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            profile_image: user.profile_image.clone(),
        }
    }
}

/// Author of the tweet being replied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplySummary {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl From<&User> for ReplySummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
        }
    }
}

/// A tweet with its related users resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub tweet: Tweet,
    /// `None` when the author no longer exists
    pub author: Option<AuthorSummary>,
    /// `None` for top-level tweets and for replies whose parent is gone
    pub reply_parent_author: Option<ReplySummary>,
}

/// FeedComposer implementation
pub struct FeedComposerImpl<T, U>
where
    T: TweetRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    tweet_repo: Arc<T>,
    user_repo: Arc<U>,
}

impl<T, U> FeedComposerImpl<T, U>
where
    T: TweetRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Create a new FeedComposerImpl
    pub fn new(tweet_repo: Arc<T>, user_repo: Arc<U>) -> Self {
        Self {
            tweet_repo,
            user_repo,
        }
    }

    async fn require_user(&self, username: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    /// Tweets liked by a user, newest like first. Ids of deleted tweets are
    /// skipped before pagination.
    async fn liked_tweets(
        &self,
        username: &str,
        pagination: Pagination,
    ) -> Result<Vec<Tweet>, AppError> {
        let user = self.require_user(username).await?;
        let mut by_id: HashMap<i64, Tweet> = self
            .tweet_repo
            .find_by_ids(&user.liked_tweet_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let ordered = user
            .liked_tweet_ids
            .iter()
            .filter_map(|id| by_id.remove(id));

        Ok(pagination.apply(ordered))
    }

    /// Compile a scope into a store predicate.
    async fn filter_for(&self, viewer: &User, scope: FeedScope) -> Result<TweetFilter, AppError> {
        let filter = match scope {
            FeedScope::HomeTimeline => TweetFilter {
                author_ids: Some(viewer.timeline_author_ids()),
                replies: ReplyFilter::TopLevelOnly,
                ..Default::default()
            },
            FeedScope::AuthorTimeline {
                username,
                search,
                media_only,
                replies,
            } => {
                let author = self.require_user(&username).await?;
                TweetFilter {
                    author_ids: Some(vec![author.id]),
                    content_contains: search,
                    media_only,
                    replies,
                }
            }
            FeedScope::Search {
                query,
                media_only,
                replies,
            } => TweetFilter {
                content_contains: Some(query),
                media_only,
                replies,
                ..Default::default()
            },
            FeedScope::MediaOnly { replies } => TweetFilter {
                media_only: true,
                replies,
                ..Default::default()
            },
            FeedScope::RepliesTo { reply_to_id } => TweetFilter {
                replies: ReplyFilter::RepliesTo(reply_to_id),
                ..Default::default()
            },
            FeedScope::AllTweets => TweetFilter::default(),
            FeedScope::LikedByUser { .. } => {
                return Err(AppError::Internal(
                    "liked-by scope has no store predicate".into(),
                ))
            }
        };
        Ok(filter)
    }
}

/// Resolve authors and reply-parent authors for a page of tweets.
///
/// Issues one batched tweet lookup for the reply parents and one batched user
/// lookup covering every author involved.
pub(crate) async fn preload<T, U>(
    tweet_repo: &T,
    user_repo: &U,
    tweets: Vec<Tweet>,
) -> Result<Vec<FeedItem>, AppError>
where
    T: TweetRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    let mut parent_ids: Vec<i64> = tweets.iter().filter_map(|t| t.reply_to_id).collect();
    parent_ids.sort_unstable();
    parent_ids.dedup();

    let parent_authors: HashMap<i64, i64> = tweet_repo
        .find_by_ids(&parent_ids)
        .await?
        .into_iter()
        .map(|parent| (parent.id, parent.author_id))
        .collect();

    let mut user_ids: Vec<i64> = tweets
        .iter()
        .map(|t| t.author_id)
        .chain(parent_authors.values().copied())
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let users: HashMap<i64, User> = user_repo
        .find_by_ids(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(tweets
        .into_iter()
        .map(|tweet| {
            let author = users.get(&tweet.author_id).map(AuthorSummary::from);
            let reply_parent_author = tweet
                .reply_to_id
                .and_then(|parent| parent_authors.get(&parent))
                .and_then(|author_id| users.get(author_id))
                .map(ReplySummary::from);
            FeedItem {
                tweet,
                author,
                reply_parent_author,
            }
        })
        .collect())
}

#[async_trait]
impl<T, U> FeedComposer for FeedComposerImpl<T, U>
where
    T: TweetRepository + ?Sized + 'static,
    U: UserRepository + ?Sized + 'static,
{
    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn compose_query(
        &self,
        viewer: &User,
        params: &FeedParams,
    ) -> Result<Vec<FeedItem>, AppError> {
        let scope = FeedScope::resolve(params);
        tracing::debug!(scope = scope.kind(), "Resolved feed scope");
        metrics::record_feed_query(scope.kind());

        let tweets = match scope {
            FeedScope::LikedByUser { username } => {
                self.liked_tweets(&username, params.pagination).await?
            }
            scope => {
                let filter = self.filter_for(viewer, scope).await?;
                self.tweet_repo.find_many(&filter, params.pagination).await?
            }
        };

        preload(self.tweet_repo.as_ref(), self.user_repo.as_ref(), tweets).await
    }
}
