//! User Handlers

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::application::dto::request::{UpdateProfileRequest, UserListParams};
use crate::application::dto::response::{MessageResponse, UserListResponse, UserResponse};
use crate::application::services::{SocialActionCoordinator, UserService};
use crate::presentation::http::extractors::{ApiJson, ApiQuery};
use crate::presentation::middleware::Viewer;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, validate};
use crate::startup::AppState;

/// Get the viewer's own profile
pub async fn get_own_profile(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().get_own_profile(&viewer).await?;
    Ok(Json(user.into()))
}

/// Get a profile by username
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().get_profile(&viewer, &username).await?;
    Ok(Json(user.into()))
}

/// Update the viewer's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    validate(&body)?;

    let user = state
        .user_service()
        .update_profile(&viewer, body.into())
        .await?;
    Ok(Json(user.into()))
}

/// Search users or list followers/following
pub async fn list_users(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    ApiQuery(params): ApiQuery<UserListParams>,
) -> Result<Json<UserListResponse>, AppError> {
    let query = params.into_query(state.settings.feed.default_limit)?;
    let pagination = query.pagination;

    let users = state.user_service().list_users(&viewer, query).await?;
    Ok(Json(UserListResponse::page(users, pagination)))
}

/// Users the viewer might want to follow
pub async fn suggestions(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state
        .user_service()
        .suggestions(&viewer, state.settings.feed.suggestion_limit)
        .await?;
    Ok(Json(UserListResponse::unpaged(users)))
}

pub async fn follow_user(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let target = parse_id("user id", &id)?;
    state.social_actions().follow(&viewer, target).await?;
    Ok(Json(MessageResponse::new("User followed")))
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(Viewer(viewer)): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let target = parse_id("user id", &id)?;
    state.social_actions().unfollow(&viewer, target).await?;
    Ok(Json(MessageResponse::new("User unfollowed")))
}
