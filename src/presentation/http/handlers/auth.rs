//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::AuthResponse;
use crate::application::services::{AuthService, UserView};
use crate::presentation::http::extractors::ApiJson;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate(&body)?;

    let (user, token) = state.auth_service().register(body.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(token, UserView::new(&user, &user))),
    ))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate(&body)?;

    let (user, token) = state
        .auth_service()
        .authenticate(&body.email, &body.password)
        .await?;
    tracing::debug!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse::new(token, UserView::new(&user, &user))))
}
