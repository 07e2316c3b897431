//! Mock social feed generator.
//!
//! There is no social upstream; the dashboard consumes a deterministic,
//! generated feed.

use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One post in the mocked social feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: String,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
    pub hashtags: Vec<String>,
    pub verified: bool,
}

fn hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn minutes_ago(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[allow(clippy::too_many_arguments)]
fn post(
    id: &str,
    username: &str,
    display_name: &str,
    content: &str,
    image: Option<&str>,
    timestamp: String,
    likes: u32,
    comments: u32,
    shares: u32,
    hashtags: &[&str],
    verified: bool,
) -> SocialPost {
    let seed = username.trim_start_matches('@');
    SocialPost {
        id: id.to_string(),
        username: username.to_string(),
        display_name: display_name.to_string(),
        avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={seed}"),
        content: content.to_string(),
        image: image.map(str::to_string),
        timestamp,
        likes,
        comments,
        shares,
        hashtags: hashtags.iter().map(|h| h.to_string()).collect(),
        verified,
    }
}

/// The fixed pool every feed page and search draws from.
fn all_posts() -> Vec<SocialPost> {
    vec![
        post(
            "social-1",
            "@techguru",
            "Tech Guru",
            "Just finished building an amazing new AI-powered dashboard! The future of content aggregation is here. #technology #AI #webdev",
            Some("https://images.unsplash.com/photo-1485827404703-89b55fcc595e?w=800"),
            hours_ago(1),
            1243,
            87,
            234,
            &["technology", "AI", "webdev"],
            true,
        ),
        post(
            "social-2",
            "@movielover",
            "Cinema Enthusiast",
            "Can't wait for the new releases this weekend! The lineup looks absolutely incredible. What's everyone watching? #movies #cinema",
            None,
            hours_ago(2),
            892,
            156,
            67,
            &["movies", "cinema"],
            false,
        ),
        post(
            "social-3",
            "@weatherwatcher",
            "Weather Watch",
            "Beautiful sunny day today! Perfect weather for outdoor activities. Don't forget your sunscreen! #weather #sunshine",
            Some("https://images.unsplash.com/photo-1601297183305-6df142704ea2?w=800"),
            hours_ago(3),
            654,
            43,
            89,
            &["weather", "sunshine"],
            true,
        ),
        post(
            "social-4",
            "@newsbreaker",
            "Breaking News Now",
            "BREAKING: Major developments in the tech industry. Sources confirm new partnerships forming. More details to follow. #news #breaking",
            None,
            hours_ago(4),
            2341,
            543,
            1234,
            &["news", "breaking"],
            true,
        ),
        post(
            "social-5",
            "@designinspire",
            "Design Inspiration",
            "Clean UI designs are timeless. Here's a showcase of minimal dashboard concepts that prioritize user experience. #design #UI #UX",
            Some("https://images.unsplash.com/photo-1558655146-9f40138edfeb?w=800"),
            hours_ago(5),
            1876,
            234,
            456,
            &["design", "UI", "UX"],
            false,
        ),
        post(
            "social-6",
            "@sportsfanatic",
            "Sports Central",
            "What an incredible game last night! That final quarter had me on the edge of my seat. Championship vibes! #sports #basketball",
            None,
            hours_ago(6),
            3421,
            789,
            567,
            &["sports", "basketball"],
            true,
        ),
        post(
            "social-7",
            "@foodielife",
            "Foodie Adventures",
            "Tried this amazing new restaurant downtown. The fusion cuisine is absolutely mind-blowing! Highly recommend! #food #foodie",
            Some("https://images.unsplash.com/photo-1504674900247-0877df9cc836?w=800"),
            hours_ago(7),
            1567,
            312,
            178,
            &["food", "foodie"],
            false,
        ),
        post(
            "social-8",
            "@travelbug",
            "Travel Diaries",
            "Just landed in an incredible destination! The views are absolutely breathtaking. Can't wait to explore more. #travel #adventure",
            Some("https://images.unsplash.com/photo-1488646953014-85cb44e25828?w=800"),
            hours_ago(8),
            2789,
            445,
            892,
            &["travel", "adventure"],
            true,
        ),
        post(
            "social-9",
            "@codemaster",
            "Code Master",
            "Just released a new open-source project! Check it out on GitHub. Would love your feedback! #coding #opensource #developer",
            None,
            hours_ago(9),
            1923,
            267,
            445,
            &["coding", "opensource", "developer"],
            true,
        ),
        post(
            "social-10",
            "@musicvibes",
            "Music Vibes",
            "New album drop just hit different! This is going to be on repeat all week. What are you listening to? #music #newrelease",
            Some("https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?w=800"),
            hours_ago(10),
            2156,
            389,
            234,
            &["music", "newrelease"],
            false,
        ),
    ]
}

const PAGE_SIZE: usize = 4;

/// One page of the feed, optionally filtered by hashtag.
pub fn feed_posts(page: usize, hashtag: Option<&str>) -> Vec<SocialPost> {
    let filtered: Vec<SocialPost> = match hashtag {
        Some(tag) => all_posts()
            .into_iter()
            .filter(|p| p.hashtags.iter().any(|h| h.eq_ignore_ascii_case(tag)))
            .collect(),
        None => all_posts(),
    };

    let start = page.saturating_sub(1) * PAGE_SIZE;
    filtered.into_iter().skip(start).take(PAGE_SIZE).collect()
}

/// Case-insensitive substring search over content, author and hashtags.
pub fn search_posts(query: &str) -> Vec<SocialPost> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    all_posts()
        .into_iter()
        .filter(|p| {
            let mut haystack = format!("{} {} {}", p.content, p.username, p.display_name);
            haystack.push(' ');
            haystack.push_str(&p.hashtags.join(" "));
            haystack.to_lowercase().contains(&query)
        })
        .collect()
}

/// The fixed trending set.
pub fn trending_posts() -> Vec<SocialPost> {
    vec![
        post(
            "trending-1",
            "@viraltech",
            "Viral Tech News",
            "TRENDING: Revolutionary new framework just dropped! The developer community is going wild. This changes everything! #trending #technology",
            Some("https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=800"),
            minutes_ago(30),
            15243,
            2341,
            5678,
            &["trending", "technology"],
            true,
        ),
        post(
            "trending-2",
            "@popculture",
            "Pop Culture Daily",
            "Everyone is talking about this! The most viral moment of the day. You have to see this to believe it! #viral #trending",
            Some("https://images.unsplash.com/photo-1611162617474-5b21e879e113?w=800"),
            minutes_ago(60),
            23456,
            4567,
            8901,
            &["viral", "trending"],
            true,
        ),
        post(
            "trending-3",
            "@breakingnow",
            "Breaking Now",
            "BREAKING: This is the story everyone's sharing right now. Unprecedented developments unfolding. Stay tuned for updates! #breaking #news",
            None,
            minutes_ago(45),
            34567,
            6789,
            12345,
            &["breaking", "news"],
            true,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_pagination() {
        assert_eq!(feed_posts(1, None).len(), 4);
        assert_eq!(feed_posts(2, None).len(), 4);
        assert_eq!(feed_posts(3, None).len(), 2);
        assert!(feed_posts(4, None).is_empty());
    }

    #[test]
    fn test_pages_do_not_overlap() {
        let first = feed_posts(1, None);
        let second = feed_posts(2, None);
        assert_eq!(first[0].id, "social-1");
        assert_eq!(second[0].id, "social-5");
    }

    #[test]
    fn test_hashtag_filter_is_case_insensitive() {
        let posts = feed_posts(1, Some("ai"));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "social-1");
    }

    #[test]
    fn test_search_matches_display_name() {
        let posts = search_posts("cinema");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].username, "@movielover");
    }

    #[test]
    fn test_search_empty_query_returns_nothing() {
        assert!(search_posts("").is_empty());
    }

    #[test]
    fn test_trending_is_fixed() {
        let posts = trending_posts();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.verified));
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let value = serde_json::to_value(&trending_posts()[0]).unwrap();
        assert!(value.get("displayName").is_some());
        assert_eq!(value["username"], "@viraltech");
        // Absent images are omitted rather than serialized as null
        let no_image = serde_json::to_value(&trending_posts()[2]).unwrap();
        assert!(no_image.get("image").is_none());
    }
}
