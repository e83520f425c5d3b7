use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Raw topics ---

/// Rank assumed for a trending topic that carries no explicit rank.
pub const UNRANKED: i32 = 99;

fn default_trend_rank() -> i32 {
    UNRANKED
}

/// A candidate topic as written by the collector. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTopic {
    pub title: String,
    /// " / "-joined category tags, e.g. "Indian Politics / Hindu Culture".
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub source_link: String,
    #[serde(default)]
    pub x_trending: bool,
    #[serde(default = "default_trend_rank")]
    pub trend_rank: i32,
    /// ISO calendar date (`YYYY-MM-DD`), compared as an opaque string.
    pub collected_at: String,
}

// --- Scored topics ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub trend: i32,
    pub category: i32,
    pub freshness: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.trend + self.category + self.freshness
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    ApprovedForAi,
    Completed,
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicStatus::ApprovedForAi => write!(f, "approved_for_ai"),
            TopicStatus::Completed => write!(f, "completed"),
        }
    }
}

impl TopicStatus {
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "completed" => TopicStatus::Completed,
            _ => TopicStatus::ApprovedForAi,
        }
    }
}

/// A topic that survived filtering and made the daily top-K.
/// Identity is `(title, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTopic {
    pub title: String,
    pub category: String,
    pub source_link: String,
    pub x_trending: bool,
    pub trend_rank: i32,
    pub score: i32,
    pub score_breakdown: ScoreBreakdown,
    pub date: String,
    pub status: TopicStatus,
    pub created_at: DateTime<Utc>,
}

impl ScoredTopic {
    pub fn approved(
        raw: &RawTopic,
        breakdown: ScoreBreakdown,
        date: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: raw.title.clone(),
            category: raw.category.clone(),
            source_link: raw.source_link.clone(),
            x_trending: raw.x_trending,
            trend_rank: raw.trend_rank,
            score: breakdown.total(),
            score_breakdown: breakdown,
            date: date.to_string(),
            status: TopicStatus::ApprovedForAi,
            created_at,
        }
    }
}

// --- Generated posts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    ReadyForPosting,
    Posted,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::ReadyForPosting => write!(f, "ready_for_posting"),
            PostStatus::Posted => write!(f, "posted"),
        }
    }
}

impl PostStatus {
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "posted" => PostStatus::Posted,
            _ => PostStatus::ReadyForPosting,
        }
    }
}

pub const DEFAULT_VARIANT_TYPE: &str = "standard";

fn default_variant_type() -> String {
    DEFAULT_VARIANT_TYPE.to_string()
}

/// One draft post plus the metadata attached by enrichment.
///
/// `image_keyword`, `retweet_suggestion` and `quote_comment` stay `None`
/// until the enrichment pass has run on the owning post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub tweet: String,
    #[serde(rename = "type", default = "default_variant_type")]
    pub kind: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweet_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_comment: Option<String>,
}

impl Variant {
    pub fn new(tweet: impl Into<String>, kind: impl Into<String>, hashtags: Vec<String>) -> Self {
        Self {
            tweet: tweet.into(),
            kind: kind.into(),
            hashtags,
            image_keyword: None,
            retweet_suggestion: None,
            quote_comment: None,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.image_keyword.is_some()
            && self.retweet_suggestion.is_some()
            && self.quote_comment.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub id: Uuid,
    pub topic: String,
    pub source: String,
    /// Category of the source topic, used to pick enrichment rules.
    #[serde(default)]
    pub category: Option<String>,
    pub tweet_variants: Vec<Variant>,
    pub status: PostStatus,
    #[serde(default)]
    pub enhanced: bool,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl GeneratedPost {
    /// A fresh, unenriched post for `topic`, ready for review.
    pub fn ready(topic: &ScoredTopic, variants: Vec<Variant>, generated_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.title.clone(),
            source: topic.source_link.clone(),
            category: Some(topic.category.clone()).filter(|c| !c.is_empty()),
            tweet_variants: variants,
            status: PostStatus::ReadyForPosting,
            enhanced: false,
            generated_at,
            posted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_topic_defaults_missing_fields() {
        let raw: RawTopic =
            serde_json::from_value(json!({"title": "Budget session", "collected_at": "2025-01-10"}))
                .unwrap();
        assert_eq!(raw.category, "");
        assert!(!raw.x_trending);
        assert_eq!(raw.trend_rank, UNRANKED);
    }

    #[test]
    fn variant_defaults_type_and_hashtags() {
        let v: Variant = serde_json::from_value(json!({"tweet": "Jai Hind"})).unwrap();
        assert_eq!(v.kind, "standard");
        assert!(v.hashtags.is_empty());
        assert!(!v.is_enriched());
    }

    #[test]
    fn unenriched_variant_omits_enrichment_fields() {
        let v = Variant::new("Jai Hind", "news", vec!["#India".into()]);
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["type"], "news");
        assert!(value.get("image_keyword").is_none());
        assert!(value.get("quote_comment").is_none());
    }

    #[test]
    fn status_strings_round_trip_through_display() {
        for status in [TopicStatus::ApprovedForAi, TopicStatus::Completed] {
            assert_eq!(TopicStatus::from_str_loose(&status.to_string()), status);
        }
        for status in [PostStatus::ReadyForPosting, PostStatus::Posted] {
            assert_eq!(PostStatus::from_str_loose(&status.to_string()), status);
        }
        assert_eq!(
            serde_json::to_value(TopicStatus::ApprovedForAi).unwrap(),
            json!("approved_for_ai")
        );
    }

    #[test]
    fn ready_post_carries_topic_category() {
        let raw = RawTopic {
            title: "Ram Mandir anniversary".into(),
            category: "Hindu Culture".into(),
            source_link: "https://example.com/a".into(),
            x_trending: true,
            trend_rank: 2,
            collected_at: "2025-01-10".into(),
        };
        let topic = ScoredTopic::approved(&raw, ScoreBreakdown::default(), "2025-01-10", Utc::now());
        let post = GeneratedPost::ready(&topic, vec![], Utc::now());
        assert_eq!(post.category.as_deref(), Some("Hindu Culture"));
        assert_eq!(post.source, "https://example.com/a");
        assert_eq!(post.status, PostStatus::ReadyForPosting);
        assert!(!post.enhanced);
    }

    #[test]
    fn posted_at_is_absent_until_posted() {
        let raw = RawTopic {
            title: "ISRO launch".into(),
            category: "Global Affairs".into(),
            source_link: "https://example.com/b".into(),
            x_trending: false,
            trend_rank: UNRANKED,
            collected_at: "2025-01-10".into(),
        };
        let topic = ScoredTopic::approved(&raw, ScoreBreakdown::default(), "2025-01-10", Utc::now());
        let mut post = GeneratedPost::ready(&topic, vec![], Utc::now());

        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("posted_at").is_none());
        let back: GeneratedPost = serde_json::from_value(value).unwrap();
        assert_eq!(back.posted_at, None);

        post.posted_at = Some(Utc::now());
        assert!(serde_json::to_value(&post).unwrap()["posted_at"].is_string());
    }
}
