//! # Domain Layer
//!
//! The domain layer contains the core model of the social feed.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Tweet and User, plus the repository traits describing the
//!   document store the core relies on
//! - **value_objects**: Pagination and feed scope resolution
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Membership sets are only ever mutated through atomic add/remove

pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
