mod auth_tests;
mod feed_tests;
mod health_tests;
mod social_tests;
mod tweet_tests;
mod user_tests;
