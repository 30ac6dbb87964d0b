//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Maps between the database schema and domain User entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Pagination, ProfileUpdate, User, UserRepository, UserSet};
use crate::shared::error::AppError;

const USER_COLUMNS: &str = "id, name, username, email, password_hash, bio, location, website, \
                            profile_image, cover_image, following_ids, followers_ids, \
                            liked_tweet_ids, retweeted_tweet_ids, created_at, updated_at";

/// Database row representation matching the users table schema.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    username: String,
    email: String,
    password_hash: String,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    profile_image: Option<String>,
    cover_image: Option<String>,
    following_ids: Vec<i64>,
    followers_ids: Vec<i64>,
    liked_tweet_ids: Vec<i64>,
    retweeted_tweet_ids: Vec<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert database row to domain User entity.
    fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            bio: self.bio,
            location: self.location,
            website: self.website,
            profile_image: self.profile_image,
            cover_image: self.cover_image,
            following_ids: self.following_ids,
            followers_ids: self.followers_ids,
            liked_tweet_ids: self.liked_tweet_ids,
            retweeted_tweet_ids: self.retweeted_tweet_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE {} = $1",
            USER_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = ANY($1)",
            USER_COLUMNS
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_user()).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.find_one_by("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one_by("email", email).await
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, username, email, password_hash, bio, location, website,
                               profile_image, cover_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.website)
        .bind(&user.profile_image)
        .bind(&user.cover_image)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User with this email or username already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_user())
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                location = COALESCE($4, location),
                website = COALESCE($5, website),
                profile_image = COALESCE($6, profile_image),
                cover_image = COALESCE($7, cover_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.bio)
        .bind(&update.location)
        .bind(&update.website)
        .bind(&update.profile_image)
        .bind(&update.cover_image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    async fn add_to_set(&self, id: i64, set: UserSet, value: i64) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "UPDATE users SET {col} = array_prepend($2, {col}), updated_at = NOW() \
             WHERE id = $1 AND NOT ($2 = ANY({col}))",
            col = set.column()
        ))
        .bind(id)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_set(&self, id: i64, set: UserSet, value: i64) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "UPDATE users SET {col} = array_remove({col}, $2), updated_at = NOW() \
             WHERE id = $1 AND $2 = ANY({col})",
            col = set.column()
        ))
        .bind(id)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(
        &self,
        query: Option<String>,
        pagination: Pagination,
    ) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE $1::text IS NULL
               OR strpos(lower(name), lower($1)) > 0
               OR strpos(lower(username), lower($1)) > 0
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            USER_COLUMNS
        ))
        .bind(query)
        .bind(i64::from(pagination.limit()))
        .bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_user()).collect())
    }

    async fn suggestions(&self, exclude: &[i64], limit: u32) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE NOT (id = ANY($1))
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
            USER_COLUMNS
        ))
        .bind(exclude.to_vec())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_user()).collect())
    }
}
