//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **FeedComposer**: resolves feed requests into ordered, paginated tweets
//! - **InteractionAnnotator**: per-viewer flags and live counters
//! - **SocialActionCoordinator**: like/retweet/follow toggles on both sides
//! - **TweetService**: tweet creation, lookup, deletion, pinning
//! - **UserService**: profiles, follow listings, search, suggestions
//! - **AuthService**: registration, login, JWT validation

pub mod annotator;
pub mod auth_service;
pub mod feed_service;
pub mod social_service;
pub mod tweet_service;
pub mod user_service;

pub use annotator::{InteractionAnnotator, InteractionAnnotatorImpl, TweetView};
pub use auth_service::{AuthError, AuthService, AuthServiceImpl, Claims, Registration};
pub use feed_service::{AuthorSummary, FeedComposer, FeedComposerImpl, FeedItem, ReplySummary};
pub use social_service::{SocialActionCoordinator, SocialActionCoordinatorImpl};
pub use tweet_service::{NewTweet, TweetService, TweetServiceImpl};
pub use user_service::{UserListQuery, UserListType, UserService, UserServiceImpl, UserView};
