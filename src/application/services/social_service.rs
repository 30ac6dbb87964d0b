//! Social Action Coordinator
//!
//! Applies like, retweet and follow toggles. Every relation is stored on
//! both sides, so each successful action is a pair of atomic set writes.
//! When the second write fails the first one is undone; a failed undo is
//! logged and counted as a mirror divergence.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::domain::{Tweet, TweetRepository, TweetSet, User, UserRepository, UserSet};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Social action trait for dependency injection
#[async_trait]
pub trait SocialActionCoordinator: Send + Sync {
    async fn like(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError>;

    async fn unlike(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError>;

    async fn retweet(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError>;

    async fn unretweet(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError>;

    async fn follow(&self, viewer: &User, target_user_id: i64) -> Result<(), AppError>;

    async fn unfollow(&self, viewer: &User, target_user_id: i64) -> Result<(), AppError>;
}

/// One atomic membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetWrite {
    AddToTweet { tweet_id: i64, set: TweetSet, member: i64 },
    RemoveFromTweet { tweet_id: i64, set: TweetSet, member: i64 },
    AddToUser { user_id: i64, set: UserSet, member: i64 },
    RemoveFromUser { user_id: i64, set: UserSet, member: i64 },
}

impl SetWrite {
    /// Undo for a write that changed its set. Sets only grow at the front,
    /// so undoing a removal puts the member back first, not at its old slot.
    fn inverse(self) -> Self {
        match self {
            Self::AddToTweet { tweet_id, set, member } => Self::RemoveFromTweet { tweet_id, set, member },
            Self::RemoveFromTweet { tweet_id, set, member } => Self::AddToTweet { tweet_id, set, member },
            Self::AddToUser { user_id, set, member } => Self::RemoveFromUser { user_id, set, member },
            Self::RemoveFromUser { user_id, set, member } => Self::AddToUser { user_id, set, member },
        }
    }
}

/// Which side of a tweet interaction an action touches.
#[derive(Debug, Clone, Copy)]
struct Interaction {
    action: &'static str,
    tweet_set: TweetSet,
    user_set: UserSet,
}

const LIKE: Interaction = Interaction {
    action: "like",
    tweet_set: TweetSet::LikedBy,
    user_set: UserSet::LikedTweets,
};

const RETWEET: Interaction = Interaction {
    action: "retweet",
    tweet_set: TweetSet::RetweetedBy,
    user_set: UserSet::RetweetedTweets,
};

const ALREADY_FOLLOWING: &str = "You are already following this user";
const NOT_FOLLOWING: &str = "You are not following this user";

/// SocialActionCoordinator implementation
pub struct SocialActionCoordinatorImpl<T, U>
where
    T: TweetRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    tweet_repo: Arc<T>,
    user_repo: Arc<U>,
}

impl<T, U> SocialActionCoordinatorImpl<T, U>
where
    T: TweetRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Create a new SocialActionCoordinatorImpl
    pub fn new(tweet_repo: Arc<T>, user_repo: Arc<U>) -> Self {
        Self {
            tweet_repo,
            user_repo,
        }
    }

    async fn require_tweet(&self, action: &str, tweet_id: i64) -> Result<Tweet, AppError> {
        match self.tweet_repo.find_by_id(tweet_id).await? {
            Some(tweet) => Ok(tweet),
            None => Err(reject(action, AppError::NotFound("Tweet not found".into()))),
        }
    }

    async fn apply(&self, write: SetWrite) -> Result<bool, AppError> {
        match write {
            SetWrite::AddToTweet { tweet_id, set, member } => {
                self.tweet_repo.add_to_set(tweet_id, set, member).await
            }
            SetWrite::RemoveFromTweet { tweet_id, set, member } => {
                self.tweet_repo.remove_from_set(tweet_id, set, member).await
            }
            SetWrite::AddToUser { user_id, set, member } => {
                self.user_repo.add_to_set(user_id, set, member).await
            }
            SetWrite::RemoveFromUser { user_id, set, member } => {
                self.user_repo.remove_from_set(user_id, set, member).await
            }
        }
    }

    /// Issue both writes of an action, undoing the first if the second fails.
    ///
    /// A first write that leaves its set unchanged means a concurrent request
    /// got there after the guard read; the action is rejected with `conflict`
    /// and nothing is written or undone.
    async fn apply_pair(
        &self,
        action: &'static str,
        conflict: String,
        first: SetWrite,
        second: SetWrite,
    ) -> Result<(), AppError> {
        match self.apply(first).await {
            Ok(true) => {}
            Ok(false) => return Err(reject(action, AppError::Conflict(conflict))),
            Err(e) => {
                tracing::error!(action, error = %e, "Social action write failed");
                metrics::record_social_action(action, "failed");
                return Err(e);
            }
        }

        // An unchanged mirror already agrees with the first side
        if let Err(e) = self.apply(second).await {
            tracing::error!(action, error = %e, ?second, "Mirror write failed, compensating");
            match self.apply(first.inverse()).await {
                Ok(_) => metrics::record_social_action(action, "compensated"),
                Err(undo_err) => {
                    tracing::error!(
                        action,
                        error = %undo_err,
                        ?first,
                        "Compensation failed, mirror divergence"
                    );
                    metrics::record_social_action(action, "diverged");
                }
            }
            return Err(e);
        }

        metrics::record_social_action(action, "applied");
        Ok(())
    }

    async fn add_interaction(
        &self,
        kind: Interaction,
        viewer: &User,
        tweet_id: i64,
    ) -> Result<(), AppError> {
        let tweet = self.require_tweet(kind.action, tweet_id).await?;
        let conflict = format!("Tweet already {}d", kind.action);
        if kind.tweet_set.of(&tweet).contains(&viewer.id) {
            return Err(reject(kind.action, AppError::Conflict(conflict)));
        }

        self.apply_pair(
            kind.action,
            conflict,
            SetWrite::AddToTweet {
                tweet_id: tweet.id,
                set: kind.tweet_set,
                member: viewer.id,
            },
            SetWrite::AddToUser {
                user_id: viewer.id,
                set: kind.user_set,
                member: tweet.id,
            },
        )
        .await
    }

    async fn remove_interaction(
        &self,
        kind: Interaction,
        action: &'static str,
        viewer: &User,
        tweet_id: i64,
    ) -> Result<(), AppError> {
        let tweet = self.require_tweet(action, tweet_id).await?;
        let conflict = format!("Tweet not {}d yet", kind.action);
        if !kind.tweet_set.of(&tweet).contains(&viewer.id) {
            return Err(reject(action, AppError::Conflict(conflict)));
        }

        self.apply_pair(
            action,
            conflict,
            SetWrite::RemoveFromTweet {
                tweet_id: tweet.id,
                set: kind.tweet_set,
                member: viewer.id,
            },
            SetWrite::RemoveFromUser {
                user_id: viewer.id,
                set: kind.user_set,
                member: tweet.id,
            },
        )
        .await
    }

    /// Self-targeting is rejected before the target is looked up.
    async fn require_follow_target(
        &self,
        action: &'static str,
        viewer: &User,
        target_user_id: i64,
    ) -> Result<User, AppError> {
        if target_user_id == viewer.id {
            let message = format!("You cannot {} yourself", action);
            return Err(reject(action, AppError::InvalidOperation(message)));
        }

        match self.user_repo.find_by_id(target_user_id).await? {
            Some(target) => Ok(target),
            None => Err(reject(action, AppError::NotFound("User not found".into()))),
        }
    }
}

fn reject(action: &str, err: AppError) -> AppError {
    tracing::debug!(action, reason = %err, "Social action rejected");
    metrics::record_social_action(action, "rejected");
    err
}

#[async_trait]
impl<T, U> SocialActionCoordinator for SocialActionCoordinatorImpl<T, U>
where
    T: TweetRepository + ?Sized + 'static,
    U: UserRepository + ?Sized + 'static,
{
    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn like(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError> {
        self.add_interaction(LIKE, viewer, tweet_id).await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn unlike(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError> {
        self.remove_interaction(LIKE, "unlike", viewer, tweet_id).await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn retweet(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError> {
        self.add_interaction(RETWEET, viewer, tweet_id).await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn unretweet(&self, viewer: &User, tweet_id: i64) -> Result<(), AppError> {
        self.remove_interaction(RETWEET, "unretweet", viewer, tweet_id)
            .await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn follow(&self, viewer: &User, target_user_id: i64) -> Result<(), AppError> {
        let target = self
            .require_follow_target("follow", viewer, target_user_id)
            .await?;
        if viewer.is_following(target.id) {
            return Err(reject("follow", AppError::Conflict(ALREADY_FOLLOWING.into())));
        }

        self.apply_pair(
            "follow",
            ALREADY_FOLLOWING.into(),
            SetWrite::AddToUser {
                user_id: viewer.id,
                set: UserSet::Following,
                member: target.id,
            },
            SetWrite::AddToUser {
                user_id: target.id,
                set: UserSet::Followers,
                member: viewer.id,
            },
        )
        .await
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn unfollow(&self, viewer: &User, target_user_id: i64) -> Result<(), AppError> {
        let target = self
            .require_follow_target("unfollow", viewer, target_user_id)
            .await?;
        if !viewer.is_following(target.id) {
            return Err(reject("unfollow", AppError::Conflict(NOT_FOLLOWING.into())));
        }

        self.apply_pair(
            "unfollow",
            NOT_FOLLOWING.into(),
            SetWrite::RemoveFromUser {
                user_id: viewer.id,
                set: UserSet::Following,
                member: target.id,
            },
            SetWrite::RemoveFromUser {
                user_id: target.id,
                set: UserSet::Followers,
                member: viewer.id,
            },
        )
        .await
    }
}
