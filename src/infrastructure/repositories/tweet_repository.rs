//! Tweet Repository Implementation
//!
//! PostgreSQL implementation of tweet storage. Membership sets are `BIGINT[]`
//! columns mutated with single-statement `array_prepend` / `array_remove`
//! updates, so concurrent likes and retweets never overwrite each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::{Pagination, ReplyFilter, Tweet, TweetFilter, TweetRepository, TweetSet};
use crate::shared::error::AppError;

const TWEET_COLUMNS: &str = "id, author_id, content, media, liked_by, retweeted_by, \
                             reply_to_id, retweet_of_id, pinned, created_at";

/// Feed ordering, matching the in-memory store's tie-break.
const FEED_ORDER: &str = " ORDER BY created_at DESC, id DESC";

/// PostgreSQL tweet repository implementation.
#[derive(Clone)]
pub struct PgTweetRepository {
    pool: PgPool,
}

impl PgTweetRepository {
    /// Creates a new PgTweetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for tweet queries.
#[derive(Debug, sqlx::FromRow)]
struct TweetRow {
    id: i64,
    author_id: i64,
    content: String,
    media: Option<String>,
    liked_by: Vec<i64>,
    retweeted_by: Vec<i64>,
    reply_to_id: Option<i64>,
    retweet_of_id: Option<i64>,
    pinned: bool,
    created_at: DateTime<Utc>,
}

impl TweetRow {
    /// Converts database row to domain Tweet entity.
    fn into_tweet(self) -> Tweet {
        Tweet {
            id: self.id,
            author_id: self.author_id,
            content: self.content,
            media: self.media,
            liked_by: self.liked_by,
            retweeted_by: self.retweeted_by,
            reply_to_id: self.reply_to_id,
            retweet_of_id: self.retweet_of_id,
            pinned: self.pinned,
            created_at: self.created_at,
        }
    }
}

/// Append the WHERE conditions for a filter.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TweetFilter) {
    qb.push(" WHERE TRUE");

    if let Some(ref authors) = filter.author_ids {
        qb.push(" AND author_id = ANY(").push_bind(authors.clone()).push(")");
    }

    if let Some(ref query) = filter.content_contains {
        // strpos keeps the match a literal substring (no LIKE wildcards)
        qb.push(" AND strpos(lower(content), lower(")
            .push_bind(query.clone())
            .push(")) > 0");
    }

    if filter.media_only {
        qb.push(" AND media IS NOT NULL AND media <> ''");
    }

    match filter.replies {
        ReplyFilter::TopLevelOnly => {
            qb.push(" AND reply_to_id IS NULL");
        }
        ReplyFilter::RepliesTo(parent) => {
            qb.push(" AND reply_to_id = ").push_bind(parent);
        }
        ReplyFilter::Any => {}
    }
}

#[async_trait]
impl TweetRepository for PgTweetRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tweet>, AppError> {
        let row = sqlx::query_as::<_, TweetRow>(&format!(
            "SELECT {} FROM tweets WHERE id = $1",
            TWEET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_tweet()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Tweet>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TweetRow>(&format!(
            "SELECT {} FROM tweets WHERE id = ANY($1)",
            TWEET_COLUMNS
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_tweet()).collect())
    }

    /// Newest first; tweets sharing a `created_at` fall back to the higher id.
    async fn find_many(
        &self,
        filter: &TweetFilter,
        pagination: Pagination,
    ) -> Result<Vec<Tweet>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tweets", TWEET_COLUMNS));
        push_filter(&mut qb, filter);
        qb.push(FEED_ORDER)
            .push(" LIMIT ")
            .push_bind(i64::from(pagination.limit()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_as::<TweetRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_tweet()).collect())
    }

    async fn count_replies(&self, tweet_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tweets WHERE reply_to_id = $1",
        )
        .bind(tweet_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create(&self, tweet: &Tweet) -> Result<Tweet, AppError> {
        let row = sqlx::query_as::<_, TweetRow>(&format!(
            r#"
            INSERT INTO tweets (id, author_id, content, media, reply_to_id, retweet_of_id, pinned, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            TWEET_COLUMNS
        ))
        .bind(tweet.id)
        .bind(tweet.author_id)
        .bind(&tweet.content)
        .bind(&tweet.media)
        .bind(tweet.reply_to_id)
        .bind(tweet.retweet_of_id)
        .bind(tweet.pinned)
        .bind(tweet.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_tweet())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_to_set(&self, id: i64, set: TweetSet, user_id: i64) -> Result<bool, AppError> {
        let column = set.column();
        let result = sqlx::query(&format!(
            "UPDATE tweets SET {col} = array_prepend($2, {col}) WHERE id = $1 AND NOT ($2 = ANY({col}))",
            col = column
        ))
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_set(
        &self,
        id: i64,
        set: TweetSet,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let column = set.column();
        let result = sqlx::query(&format!(
            "UPDATE tweets SET {col} = array_remove({col}, $2) WHERE id = $1 AND $2 = ANY({col})",
            col = column
        ))
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_pinned(&self, id: i64, pinned: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tweets SET pinned = $2 WHERE id = $1")
            .bind(id)
            .bind(pinned)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tweet with id {} not found", id)));
        }

        Ok(())
    }
}
