//! News article model and mock headlines.
//!
//! The news collaborator degrades to this dataset instead of surfacing an
//! error when no API key is configured or the upstream call fails.

use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Publisher attribution for one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSource {
    pub id: Option<String>,
    pub name: String,
}

/// One news article in the shape the dashboard consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub url_to_image: String,
    pub published_at: String,
    pub source: NewsSource,
    pub author: String,
    pub category: String,
}

/// Envelope matching the upstream provider's response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    pub status: String,
    pub total_results: usize,
    pub articles: Vec<NewsArticle>,
}

fn hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[allow(clippy::too_many_arguments)]
fn article(
    id: &str,
    title: &str,
    description: &str,
    content: &str,
    url: &str,
    image: &str,
    hours: i64,
    source_id: &str,
    source_name: &str,
    author: &str,
    category: &str,
) -> NewsArticle {
    NewsArticle {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        content: content.to_string(),
        url: url.to_string(),
        url_to_image: image.to_string(),
        published_at: hours_ago(hours),
        source: NewsSource {
            id: Some(source_id.to_string()),
            name: source_name.to_string(),
        },
        author: author.to_string(),
        category: category.to_string(),
    }
}

/// Mock top headlines, optionally filtered by category.
///
/// `general` returns the whole set, mirroring the upstream's behavior for
/// its default category.
pub fn mock_headlines(category: &str) -> NewsFeed {
    let articles = vec![
        article(
            "mock-1",
            "Breaking: Major Tech Company Announces Revolutionary AI Product",
            "A leading technology company has unveiled a groundbreaking artificial intelligence system that promises to transform how we interact with computers.",
            "The new AI system demonstrates unprecedented capabilities in natural language understanding and generation...",
            "https://example.com/tech-news-1",
            "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800",
            2,
            "tech-news",
            "Tech News Daily",
            "Sarah Johnson",
            "technology",
        ),
        article(
            "mock-2",
            "Global Markets React to Economic Policy Changes",
            "Stock markets worldwide showed mixed reactions following the announcement of new economic policies by major central banks.",
            "Financial analysts are closely monitoring the situation as investors digest the implications...",
            "https://example.com/business-news-1",
            "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3?w=800",
            4,
            "financial-times",
            "Financial Times",
            "Michael Chen",
            "business",
        ),
        article(
            "mock-3",
            "Scientists Make Breakthrough Discovery in Renewable Energy",
            "Researchers have developed a new solar cell technology that could significantly increase energy efficiency and reduce costs.",
            "The breakthrough represents a major step forward in the quest for sustainable energy solutions...",
            "https://example.com/science-news-1",
            "https://images.unsplash.com/photo-1509391366360-2e959784a276?w=800",
            6,
            "science-daily",
            "Science Daily",
            "Dr. Emily Watson",
            "science",
        ),
        article(
            "mock-4",
            "Championship Team Secures Historic Victory",
            "In an exciting finale, the underdog team claimed their first championship title in franchise history.",
            "The thrilling match kept fans on the edge of their seats until the final moments...",
            "https://example.com/sports-news-1",
            "https://images.unsplash.com/photo-1461896836934-ffe607ba8211?w=800",
            8,
            "espn",
            "ESPN",
            "James Martinez",
            "sports",
        ),
        article(
            "mock-5",
            "New Health Guidelines Released for Better Wellness",
            "Medical experts have released updated guidelines focusing on preventive care and mental health awareness.",
            "The comprehensive guidelines emphasize the importance of holistic health approaches...",
            "https://example.com/health-news-1",
            "https://images.unsplash.com/photo-1505751172876-fa1923c5c528?w=800",
            10,
            "health-magazine",
            "Health Magazine",
            "Dr. Lisa Anderson",
            "health",
        ),
        article(
            "mock-6",
            "Entertainment Industry Embraces Streaming Revolution",
            "Major studios are adapting to changing consumer preferences with new streaming strategies.",
            "The shift to digital platforms continues to reshape how content is produced and distributed...",
            "https://example.com/entertainment-news-1",
            "https://images.unsplash.com/photo-1594908900066-3f47337549d8?w=800",
            12,
            "variety",
            "Variety",
            "Robert Davis",
            "entertainment",
        ),
    ];

    let filtered: Vec<NewsArticle> = if category == "general" {
        articles
    } else {
        articles
            .into_iter()
            .filter(|a| a.category == category)
            .collect()
    };

    NewsFeed {
        status: "ok".to_string(),
        total_results: filtered.len(),
        articles: filtered,
    }
}

/// Mock results for a search query, used when the upstream is unavailable.
pub fn mock_search_results(query: &str) -> NewsFeed {
    let articles = vec![
        article(
            "search-mock-1",
            &format!("Latest Updates on {query}"),
            &format!("Comprehensive coverage of {query} with expert analysis and breaking developments."),
            &format!("Our reporters are following every angle of the {query} story as it develops..."),
            "https://example.com/search-result-1",
            "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=800",
            1,
            "newswire",
            "Newswire",
            "Staff Reports",
            "general",
        ),
        article(
            "search-mock-2",
            &format!("{query}: What You Need to Know"),
            &format!("An in-depth look at {query} and its implications."),
            &format!("Experts weigh in on what {query} means going forward..."),
            "https://example.com/search-result-2",
            "https://images.unsplash.com/photo-1495020689067-958852a7765e?w=800",
            3,
            "daily-briefing",
            "Daily Briefing",
            "Editorial Team",
            "general",
        ),
    ];

    NewsFeed {
        status: "ok".to_string(),
        total_results: articles.len(),
        articles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_returns_all_categories() {
        let feed = mock_headlines("general");
        assert_eq!(feed.status, "ok");
        assert_eq!(feed.articles.len(), 6);
        assert_eq!(feed.total_results, 6);
    }

    #[test]
    fn test_category_filter() {
        let feed = mock_headlines("science");
        assert_eq!(feed.articles.len(), 1);
        assert_eq!(feed.articles[0].category, "science");
        assert_eq!(feed.total_results, 1);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let feed = mock_headlines("gardening");
        assert!(feed.articles.is_empty());
        assert_eq!(feed.total_results, 0);
    }

    #[test]
    fn test_search_results_embed_query() {
        let feed = mock_search_results("rust");
        assert_eq!(feed.articles.len(), 2);
        assert!(feed.articles[0].title.contains("rust"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let feed = mock_headlines("general");
        let value = serde_json::to_value(&feed).unwrap();
        assert!(value.get("totalResults").is_some());
        assert!(value["articles"][0].get("urlToImage").is_some());
        assert!(value["articles"][0].get("publishedAt").is_some());
    }
}
