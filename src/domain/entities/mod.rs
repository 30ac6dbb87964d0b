//! # Domain Entities
//!
//! Core domain entities of the social feed.
//!
//! - **User**: account, profile fields and its side of the follow graph
//! - **Tweet**: a short post with like/retweet membership sets
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait describing the document
//! store operations the core needs. These traits are implemented in the
//! infrastructure layer, following the dependency inversion principle.

mod tweet;
mod user;

pub use tweet::{Tweet, TweetFilter, TweetRepository, TweetSet, MAX_TWEET_LENGTH};
pub use user::{ProfileUpdate, User, UserRepository, UserSet};

#[cfg(test)]
pub use tweet::MockTweetRepository;
#[cfg(test)]
pub use user::MockUserRepository;
