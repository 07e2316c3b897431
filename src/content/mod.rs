//! Typed content models and the mock datasets served when an upstream
//! provider is unavailable or intentionally absent.

mod news;
mod social;

pub use news::{mock_headlines, mock_search_results, NewsArticle, NewsFeed, NewsSource};
pub use social::{feed_posts, search_posts, trending_posts, SocialPost};
