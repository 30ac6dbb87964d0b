//! # Social Feed Library
//!
//! Backend of a short-post social network:
//! - Feed composition (home timeline, author timelines, likes, search, media, replies)
//! - Per-viewer interaction annotation of tweets
//! - Likes, retweets and follows kept consistent across both sides of each relation
//! - PostgreSQL or in-memory storage behind repository traits
//!
//! ## Architecture
//!
//! - **Domain Layer**: Tweet and User entities, repository traits, feed scope resolution
//! - **Application Layer**: Services and DTOs
//! - **Infrastructure Layer**: Database, in-memory store and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! social_feed/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects and repository traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Repositories, database pool, metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, snowflake IDs, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
