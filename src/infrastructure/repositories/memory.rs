//! In-Memory Repository Implementations
//!
//! Process-local implementations of the domain repository traits, used by the
//! test suite and by the `memory` database backend.
//!
//! Tweets live in a single vector behind an `RwLock`; listings sort newest
//! first with ties broken by id, matching the Postgres ordering.
//! Users live in a `DashMap`; every set mutation runs under one entry guard,
//! so concurrent add/remove calls on the same user never lose updates.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::domain::{
    Pagination, ProfileUpdate, Tweet, TweetFilter, TweetRepository, TweetSet, User,
    UserRepository, UserSet,
};
use crate::shared::error::AppError;

/// In-memory tweet collection.
#[derive(Default)]
pub struct InMemoryTweetRepository {
    tweets: RwLock<Vec<Tweet>>,
}

impl InMemoryTweetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tweets.
    pub fn len(&self) -> usize {
        self.tweets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.read().is_empty()
    }
}

#[async_trait]
impl TweetRepository for InMemoryTweetRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tweet>, AppError> {
        Ok(self.tweets.read().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Tweet>, AppError> {
        Ok(self
            .tweets
            .read()
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn find_many(
        &self,
        filter: &TweetFilter,
        pagination: Pagination,
    ) -> Result<Vec<Tweet>, AppError> {
        let mut matched: Vec<Tweet> = self
            .tweets
            .read()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(pagination.apply(matched))
    }

    async fn count_replies(&self, tweet_id: i64) -> Result<i64, AppError> {
        let count = self
            .tweets
            .read()
            .iter()
            .filter(|t| t.reply_to_id == Some(tweet_id))
            .count();
        Ok(count as i64)
    }

    async fn create(&self, tweet: &Tweet) -> Result<Tweet, AppError> {
        let mut tweets = self.tweets.write();
        if tweets.iter().any(|t| t.id == tweet.id) {
            return Err(AppError::Conflict(format!("Tweet {} already exists", tweet.id)));
        }
        tweets.push(tweet.clone());
        Ok(tweet.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tweets = self.tweets.write();
        let before = tweets.len();
        tweets.retain(|t| t.id != id);
        Ok(tweets.len() != before)
    }

    async fn add_to_set(&self, id: i64, set: TweetSet, user_id: i64) -> Result<bool, AppError> {
        let mut tweets = self.tweets.write();
        let Some(tweet) = tweets.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        let members = set.of_mut(tweet);
        if members.contains(&user_id) {
            return Ok(false);
        }
        members.insert(0, user_id);
        Ok(true)
    }

    async fn remove_from_set(
        &self,
        id: i64,
        set: TweetSet,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let mut tweets = self.tweets.write();
        let Some(tweet) = tweets.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        let members = set.of_mut(tweet);
        let before = members.len();
        members.retain(|m| *m != user_id);
        Ok(members.len() != before)
    }

    async fn set_pinned(&self, id: i64, pinned: bool) -> Result<(), AppError> {
        let mut tweets = self.tweets.write();
        let tweet = tweets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Tweet with id {} not found", id)))?;
        tweet.pinned = pinned;
        Ok(())
    }
}

/// In-memory user collection.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<i64, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users sorted newest first, ties broken by id.
    fn sorted_users(&self, keep: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        users
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.users.iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.iter().any(|u| u.email == email))
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        if self
            .users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }
        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        Ok(self.users.get_mut(&id).map(|mut user| {
            update.apply(user.value_mut());
            user.value().clone()
        }))
    }

    async fn add_to_set(&self, id: i64, set: UserSet, value: i64) -> Result<bool, AppError> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(false);
        };
        let members = set.of_mut(user.value_mut());
        if members.contains(&value) {
            return Ok(false);
        }
        members.insert(0, value);
        Ok(true)
    }

    async fn remove_from_set(&self, id: i64, set: UserSet, value: i64) -> Result<bool, AppError> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(false);
        };
        let members = set.of_mut(user.value_mut());
        let before = members.len();
        members.retain(|m| *m != value);
        Ok(members.len() != before)
    }

    async fn search(
        &self,
        query: Option<String>,
        pagination: Pagination,
    ) -> Result<Vec<User>, AppError> {
        let needle = query.map(|q| q.to_lowercase());
        let users = self.sorted_users(|u| match &needle {
            Some(q) => {
                u.name.to_lowercase().contains(q) || u.username.to_lowercase().contains(q)
            }
            None => true,
        });
        Ok(pagination.apply(users))
    }

    async fn suggestions(&self, exclude: &[i64], limit: u32) -> Result<Vec<User>, AppError> {
        Ok(self
            .sorted_users(|u| !exclude.contains(&u.id))
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

/// Both in-memory repositories, ready to share.
pub fn in_memory_repositories() -> (Arc<InMemoryTweetRepository>, Arc<InMemoryUserRepository>) {
    (
        Arc::new(InMemoryTweetRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}
