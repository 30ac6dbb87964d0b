//! Repository Implementations
//!
//! Concrete implementations of the domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** / **PgTweetRepository** - PostgreSQL, membership
//!   sets as `BIGINT[]` columns
//! - **InMemoryUserRepository** / **InMemoryTweetRepository** - process-local
//!   store for tests and the `memory` backend
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgTweetRepository, PgUserRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let tweet_repo = PgTweetRepository::new(pool);
//! }
//! ```

pub mod memory;
pub mod tweet_repository;
pub mod user_repository;

pub use memory::{in_memory_repositories, InMemoryTweetRepository, InMemoryUserRepository};
pub use tweet_repository::PgTweetRepository;
pub use user_repository::PgUserRepository;
