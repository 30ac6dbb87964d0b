//! Feed scope resolution.
//!
//! A feed request carries up to five optional filters whose precedence is
//! not commutative. [`FeedScope::resolve`] turns them into exactly one
//! variant, once per request, so the precedence can be read and tested in
//! isolation from any store.

use std::fmt;
use std::str::FromStr;

use super::pagination::Pagination;
use crate::shared::error::AppError;

/// The `type` request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    Tweets,
    Replies,
    Media,
    Likes,
}

impl FeedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tweets => "tweets",
            Self::Replies => "replies",
            Self::Media => "media",
            Self::Likes => "likes",
        }
    }
}

impl FromStr for FeedType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tweets" => Ok(Self::Tweets),
            "replies" => Ok(Self::Replies),
            "media" => Ok(Self::Media),
            "likes" => Ok(Self::Likes),
            other => Err(AppError::invalid_field(
                "type",
                format!("Unknown feed type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How replies are treated by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFilter {
    /// Replies are excluded
    TopLevelOnly,
    /// Only replies to the given tweet
    RepliesTo(i64),
    /// No reply filter at all
    #[default]
    Any,
}

impl ReplyFilter {
    fn for_params(params: &FeedParams) -> Self {
        if let Some(parent) = params.reply_to_id {
            return Self::RepliesTo(parent);
        }
        match params.feed_type {
            None | Some(FeedType::Tweets) => Self::TopLevelOnly,
            // `replies` (and `likes` without a username) apply no reply
            // filter, so both top-level tweets and replies are eligible.
            Some(_) => Self::Any,
        }
    }
}

/// Parameters of a feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedParams {
    pub username: Option<String>,
    pub search_query: Option<String>,
    pub feed_type: Option<FeedType>,
    pub reply_to_id: Option<i64>,
    pub pagination: Pagination,
}

/// The resolved shape of a feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// Viewer's own tweets plus those of followed users, replies excluded
    HomeTimeline,

    /// Tweets liked by a user, most recent like first
    LikedByUser { username: String },

    /// Tweets authored by a user, optionally narrowed further
    AuthorTimeline {
        username: String,
        search: Option<String>,
        media_only: bool,
        replies: ReplyFilter,
    },

    /// Content search across all authors
    Search {
        query: String,
        media_only: bool,
        replies: ReplyFilter,
    },

    /// Tweets carrying media, across all authors
    MediaOnly { replies: ReplyFilter },

    /// Replies to one tweet
    RepliesTo { reply_to_id: i64 },

    /// Every tweet and reply, unscoped
    AllTweets,
}

impl FeedScope {
    /// Resolve request parameters into a scope.
    ///
    /// Precedence: `type=likes` with a username short-circuits every other
    /// filter; then username, search, media, reply target; with none of
    /// those the home timeline applies when `type` is absent or `tweets`.
    pub fn resolve(params: &FeedParams) -> Self {
        let username = params
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        // Whitespace is a legitimate substring to search for
        let search = params.search_query.clone().filter(|q| !q.is_empty());
        let media_only = params.feed_type == Some(FeedType::Media);
        let replies = ReplyFilter::for_params(params);

        if params.feed_type == Some(FeedType::Likes) {
            if let Some(username) = username.clone() {
                return Self::LikedByUser { username };
            }
        }

        if let Some(username) = username {
            return Self::AuthorTimeline {
                username,
                search,
                media_only,
                replies,
            };
        }

        if let Some(query) = search {
            return Self::Search {
                query,
                media_only,
                replies,
            };
        }

        if media_only {
            return Self::MediaOnly { replies };
        }

        if let Some(reply_to_id) = params.reply_to_id {
            return Self::RepliesTo { reply_to_id };
        }

        match params.feed_type {
            None | Some(FeedType::Tweets) => Self::HomeTimeline,
            Some(_) => Self::AllTweets,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HomeTimeline => "home_timeline",
            Self::LikedByUser { .. } => "liked_by_user",
            Self::AuthorTimeline { .. } => "author_timeline",
            Self::Search { .. } => "search",
            Self::MediaOnly { .. } => "media_only",
            Self::RepliesTo { .. } => "replies_to",
            Self::AllTweets => "all_tweets",
        }
    }
}
