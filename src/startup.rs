//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthServiceImpl, FeedComposerImpl, InteractionAnnotatorImpl, SocialActionCoordinatorImpl,
    TweetServiceImpl, UserServiceImpl,
};
use crate::config::{DatabaseBackend, Settings};
use crate::domain::{TweetRepository, UserRepository};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    in_memory_repositories, PgTweetRepository, PgUserRepository,
};
use crate::presentation::http::handlers::health;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tweets: Arc<dyn TweetRepository>,
    pub users: Arc<dyn UserRepository>,
    /// Present only for the postgres backend
    pub db: Option<PgPool>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State backed by PostgreSQL repositories
    pub fn postgres(pool: PgPool, settings: Settings) -> Self {
        Self {
            tweets: Arc::new(PgTweetRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            db: Some(pool),
            snowflake: snowflake_generator(&settings),
            settings: Arc::new(settings),
        }
    }

    /// State backed by the in-process store
    pub fn in_memory(settings: Settings) -> Self {
        let (tweets, users) = in_memory_repositories();
        Self {
            tweets,
            users,
            db: None,
            snowflake: snowflake_generator(&settings),
            settings: Arc::new(settings),
        }
    }

    /// Build state for the configured backend
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        match settings.database.backend {
            DatabaseBackend::Postgres => {
                let pool = database::create_pool(&settings.database).await?;
                tracing::info!("Database connection pool created");

                if settings.database.run_migrations {
                    database::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }

                Ok(Self::postgres(pool, settings))
            }
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on shutdown");
                Ok(Self::in_memory(settings))
            }
        }
    }

    pub fn auth_service(&self) -> AuthServiceImpl<dyn UserRepository> {
        AuthServiceImpl::new(
            self.users.clone(),
            self.snowflake.clone(),
            self.settings.jwt.clone(),
        )
    }

    pub fn feed_composer(&self) -> FeedComposerImpl<dyn TweetRepository, dyn UserRepository> {
        FeedComposerImpl::new(self.tweets.clone(), self.users.clone())
    }

    pub fn annotator(&self) -> InteractionAnnotatorImpl<dyn TweetRepository> {
        InteractionAnnotatorImpl::new(self.tweets.clone())
    }

    pub fn social_actions(
        &self,
    ) -> SocialActionCoordinatorImpl<dyn TweetRepository, dyn UserRepository> {
        SocialActionCoordinatorImpl::new(self.tweets.clone(), self.users.clone())
    }

    pub fn tweet_service(&self) -> TweetServiceImpl<dyn TweetRepository, dyn UserRepository> {
        TweetServiceImpl::new(self.tweets.clone(), self.users.clone(), self.snowflake.clone())
    }

    pub fn user_service(&self) -> UserServiceImpl<dyn UserRepository> {
        UserServiceImpl::new(self.users.clone())
    }
}

fn snowflake_generator(settings: &Settings) -> Arc<SnowflakeGenerator> {
    Arc::new(SnowflakeGenerator::new(
        u64::from(settings.snowflake.machine_id),
        settings.snowflake.epoch,
    ))
}

/// Full router with tracing and CORS layers applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();
        let addr = settings.server_addr();
        let state = AppState::from_settings(settings).await?;

        let router = build_router(state);

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
