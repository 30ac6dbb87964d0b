//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL and in-memory)
//! - Connection pool and migrations
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
