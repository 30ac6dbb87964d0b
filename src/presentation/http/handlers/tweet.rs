//! Tweet Handlers
//!
//! Posting, feeds and likes/retweets.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{CreateTweetRequest, FeedQuery};
use crate::application::dto::response::{MessageResponse, TweetListResponse, TweetResponse};
use crate::application::services::{
    FeedComposer, InteractionAnnotator, SocialActionCoordinator, TweetService,
};
use crate::presentation::http::extractors::{ApiJson, ApiQuery};
use crate::presentation::middleware::Viewer;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, validate};
use crate::startup::AppState;

/// Post a tweet or a reply
pub async fn create_tweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    ApiJson(body): ApiJson<CreateTweetRequest>,
) -> Result<(StatusCode, Json<TweetResponse>), AppError> {
    validate(&body)?;

    let tweet = state
        .tweet_service()
        .create_tweet(&viewer, body.into_new_tweet()?)
        .await?;

    Ok((StatusCode::CREATED, Json(tweet.into())))
}

/// Compose and annotate one page of a feed
pub async fn list_tweets(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    ApiQuery(query): ApiQuery<FeedQuery>,
) -> Result<Json<TweetListResponse>, AppError> {
    let params = query.into_params(state.settings.feed.default_limit)?;

    let items = state.feed_composer().compose_query(&viewer, &params).await?;
    let tweets = state.annotator().annotate(&items, &viewer).await?;

    Ok(Json(TweetListResponse::new(tweets, params.pagination)))
}

/// Get a single tweet
pub async fn get_tweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<TweetResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    let tweet = state.tweet_service().get_tweet(&viewer, tweet_id).await?;
    Ok(Json(tweet.into()))
}

/// Delete one of the viewer's tweets
pub async fn delete_tweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    state.tweet_service().delete_tweet(&viewer, tweet_id).await?;
    Ok(Json(MessageResponse::new("Tweet deleted")))
}

/// Toggle the pinned flag of one of the viewer's tweets
pub async fn toggle_pin(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<TweetResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    let tweet = state.tweet_service().toggle_pin(&viewer, tweet_id).await?;
    Ok(Json(tweet.into()))
}

pub async fn like_tweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    state.social_actions().like(&viewer, tweet_id).await?;
    Ok(Json(MessageResponse::new("Tweet liked")))
}

pub async fn unlike_tweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    state.social_actions().unlike(&viewer, tweet_id).await?;
    Ok(Json(MessageResponse::new("Tweet unliked")))
}

pub async fn retweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    state.social_actions().retweet(&viewer, tweet_id).await?;
    Ok(Json(MessageResponse::new("Tweet retweeted")))
}

pub async fn unretweet(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tweet_id = parse_id("tweet id", &id)?;
    state.social_actions().unretweet(&viewer, tweet_id).await?;
    Ok(Json(MessageResponse::new("Retweet removed")))
}
