//! User Service
//!
//! Profiles, follower/following listings, user search and follow suggestions.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::domain::{Pagination, ProfileUpdate, User, UserRepository};
use crate::shared::error::AppError;

/// User service trait for dependency injection
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get the viewer's own profile
    async fn get_own_profile(&self, viewer: &User) -> Result<UserView, AppError>;

    /// Get a profile by username
    async fn get_profile(&self, viewer: &User, username: &str) -> Result<UserView, AppError>;

    /// Update the viewer's profile fields
    async fn update_profile(&self, viewer: &User, update: ProfileUpdate) -> Result<UserView, AppError>;

    /// List users by search or by follow relation
    async fn list_users(&self, viewer: &User, query: UserListQuery) -> Result<Vec<UserView>, AppError>;

    /// Users the viewer does not follow yet
    async fn suggestions(&self, viewer: &User, limit: u32) -> Result<Vec<UserView>, AppError>;
}

/// The `type` parameter of a user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListType {
    Followers,
    Following,
}

impl FromStr for UserListType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers" => Ok(Self::Followers),
            "following" => Ok(Self::Following),
            other => Err(AppError::invalid_field(
                "type",
                format!("Unknown user list type '{}'", other),
            )),
        }
    }
}

/// Parameters of a user listing.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Case-insensitive match on name or username (search mode only)
    pub search: Option<String>,
    /// List a relation instead of searching
    pub list_type: Option<UserListType>,
    /// Whose relation to list; defaults to the viewer
    pub user_id: Option<i64>,
    pub pagination: Pagination,
}

/// A user as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub username: String,
    /// Only present on the viewer's own profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,
    pub created_at: DateTime<Utc>,
}

impl UserView {
    pub fn new(user: &User, viewer: &User) -> Self {
        let own = user.id == viewer.id;
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: own.then(|| user.email.clone()),
            bio: user.bio.clone(),
            location: user.location.clone(),
            website: user.website.clone(),
            profile_image: user.profile_image.clone(),
            cover_image: user.cover_image.clone(),
            followers_count: user.followers_ids.len(),
            following_count: user.following_ids.len(),
            is_following: viewer.is_following(user.id),
            created_at: user.created_at,
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository + ?Sized,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository + ?Sized,
{
    /// Create a new UserServiceImpl
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    async fn require_user(&self, user_id: i64) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Load a page of users by id, keeping the order of `ids`.
    async fn users_in_order(&self, ids: Vec<i64>) -> Result<Vec<User>, AppError> {
        let mut by_id: HashMap<i64, User> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + ?Sized + 'static,
{
    async fn get_own_profile(&self, viewer: &User) -> Result<UserView, AppError> {
        // Re-read so counts reflect writes made after authentication
        let me = self.require_user(viewer.id).await?;
        Ok(UserView::new(&me, &me))
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn get_profile(&self, viewer: &User, username: &str) -> Result<UserView, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;
        Ok(UserView::new(&user, viewer))
    }

    #[instrument(skip(self, viewer, update), fields(viewer_id = viewer.id))]
    async fn update_profile(&self, viewer: &User, update: ProfileUpdate) -> Result<UserView, AppError> {
        let updated = self
            .user_repo
            .update_profile(viewer.id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        tracing::info!(user_id = updated.id, "Profile updated");
        Ok(UserView::new(&updated, &updated))
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn list_users(&self, viewer: &User, query: UserListQuery) -> Result<Vec<UserView>, AppError> {
        let users = match query.list_type {
            Some(list_type) => {
                let subject = match query.user_id {
                    Some(id) if id != viewer.id => self.require_user(id).await?,
                    _ => self.require_user(viewer.id).await?,
                };
                let ids = match list_type {
                    UserListType::Followers => subject.followers_ids,
                    UserListType::Following => subject.following_ids,
                };
                self.users_in_order(query.pagination.apply(ids)).await?
            }
            None => {
                let search = query.search.filter(|q| !q.trim().is_empty());
                self.user_repo.search(search, query.pagination).await?
            }
        };

        Ok(users.iter().map(|u| UserView::new(u, viewer)).collect())
    }

    #[instrument(skip(self, viewer), fields(viewer_id = viewer.id))]
    async fn suggestions(&self, viewer: &User, limit: u32) -> Result<Vec<UserView>, AppError> {
        let mut exclude = viewer.following_ids.clone();
        exclude.push(viewer.id);

        let users = self.user_repo.suggestions(&exclude, limit).await?;
        Ok(users.iter().map(|u| UserView::new(u, viewer)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockUserRepository, UserSet};
    use crate::infrastructure::repositories::InMemoryUserRepository;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn user(id: i64, username: &str) -> User {
        let mut u = User::new(
            id,
            username.to_uppercase(),
            username.into(),
            format!("{}@example.com", username),
            String::new(),
        );
        u.created_at = Utc::now() - Duration::minutes(100 - id);
        u
    }

    async fn seeded() -> Arc<InMemoryUserRepository> {
        let repo = Arc::new(InMemoryUserRepository::new());
        for (id, name) in [(1, "alice"), (2, "bob"), (3, "carol"), (4, "dave")] {
            repo.create(&user(id, name)).await.unwrap();
        }
        repo
    }

    fn names(views: &[UserView]) -> Vec<&str> {
        views.iter().map(|v| v.username.as_str()).collect()
    }

    #[tokio::test]
    async fn test_followers_listed_in_stored_order() {
        let repo = seeded().await;
        for follower in [3, 2, 4] {
            repo.add_to_set(1, UserSet::Followers, follower).await.unwrap();
        }
        let service = UserServiceImpl::new(repo.clone());
        let viewer = repo.find_by_id(2).await.unwrap().unwrap();

        let views = service
            .list_users(
                &viewer,
                UserListQuery {
                    list_type: Some(UserListType::Followers),
                    user_id: Some(1),
                    pagination: Pagination::new(1, 2).unwrap(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Most recent follower first
        assert_eq!(names(&views), vec!["dave", "bob"]);
    }

    #[tokio::test]
    async fn test_following_defaults_to_viewer() {
        let repo = seeded().await;
        repo.add_to_set(1, UserSet::Following, 3).await.unwrap();
        let service = UserServiceImpl::new(repo.clone());
        let viewer = repo.find_by_id(1).await.unwrap().unwrap();

        let views = service
            .list_users(
                &viewer,
                UserListQuery {
                    list_type: Some(UserListType::Following),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(names(&views), vec!["carol"]);
        assert!(views[0].is_following);
    }

    #[tokio::test]
    async fn test_search_matches_name_or_username() {
        let service = UserServiceImpl::new(seeded().await);
        let views = service
            .list_users(
                &user(1, "alice"),
                UserListQuery {
                    search: Some("AR".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(names(&views), vec!["carol"]);
    }

    #[tokio::test]
    async fn test_suggestions_exclude_viewer_and_followed() {
        let repo = seeded().await;
        let mut viewer = repo.find_by_id(1).await.unwrap().unwrap();
        viewer.following_ids = vec![4];

        let views = UserServiceImpl::new(repo)
            .suggestions(&viewer, 5)
            .await
            .unwrap();

        // Newest accounts first
        assert_eq!(names(&views), vec!["carol", "bob"]);
    }

    #[tokio::test]
    async fn test_email_only_on_own_profile() {
        let repo = seeded().await;
        let service = UserServiceImpl::new(repo.clone());
        let viewer = repo.find_by_id(1).await.unwrap().unwrap();

        let own = service.get_own_profile(&viewer).await.unwrap();
        assert_eq!(own.email.as_deref(), Some("alice@example.com"));

        let other = service.get_profile(&viewer, "bob").await.unwrap();
        assert!(other.email.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_profile().returning(|_, _| Ok(None));

        let err = UserServiceImpl::new(Arc::new(repo))
            .update_profile(&user(9, "ghost"), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_list_type_parse() {
        assert_eq!("followers".parse::<UserListType>().unwrap(), UserListType::Followers);
        assert!("friends".parse::<UserListType>().is_err());
    }
}
