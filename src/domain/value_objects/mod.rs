//! # Value Objects
//!
//! Immutable request-shaping types shared by the domain and application layers.
//!
//! - **Pagination**: 1-based offset pages
//! - **FeedScope**: the resolved shape of a feed request

mod feed_scope;
mod pagination;

pub use feed_scope::{FeedParams, FeedScope, FeedType, ReplyFilter};
pub use pagination::{Pagination, DEFAULT_LIMIT, DEFAULT_PAGE};
