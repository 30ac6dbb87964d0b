//! Authentication Middleware
//!
//! Resolves the bearer token into the viewing user for protected routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::application::services::AuthService;
use crate::domain::User;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// The authenticated user making the request
#[derive(Debug, Clone)]
pub struct Viewer(pub User);

/// Authentication middleware that validates JWT tokens and loads the viewer
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let user = state
        .auth_service()
        .get_current_user(&token)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "Rejected bearer token"))?;

    request.extensions_mut().insert(Viewer(user));

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))
}
