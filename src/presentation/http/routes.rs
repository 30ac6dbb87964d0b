//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::{auth_middleware, track_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(handlers::health::metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// API routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .nest("/auth", auth_routes())
        // Protected routes (require authentication)
        .nest("/tweets", tweet_routes(state.clone()))
        .nest("/users", user_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// Tweet routes (protected)
fn tweet_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::tweet::list_tweets).post(handlers::tweet::create_tweet),
        )
        .route(
            "/{id}",
            get(handlers::tweet::get_tweet).delete(handlers::tweet::delete_tweet),
        )
        .route("/{id}/like", post(handlers::tweet::like_tweet))
        .route("/{id}/unlike", post(handlers::tweet::unlike_tweet))
        .route("/{id}/retweet", post(handlers::tweet::retweet))
        .route("/{id}/unretweet", post(handlers::tweet::unretweet))
        .route("/{id}/pin", post(handlers::tweet::toggle_pin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::user::list_users))
        .route("/suggestions", get(handlers::user::suggestions))
        .route(
            "/profile",
            get(handlers::user::get_own_profile).put(handlers::user::update_profile),
        )
        .route("/profile/{username}", get(handlers::user::get_profile))
        .route("/{id}/follow", post(handlers::user::follow_user))
        .route("/{id}/unfollow", post(handlers::user::unfollow_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
