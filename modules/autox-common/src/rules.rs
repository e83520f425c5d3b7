//! Static rule tables for scoring and enrichment.
//!
//! All matching is a case-insensitive substring test against the category or
//! title. Tables are ordered; for single-choice lookups the first matching
//! row wins.

use serde::{Deserialize, Serialize};

// =============================================================================
// Scoring
// =============================================================================

/// Keywords that add `weight` to the category score when any one of them
/// appears in the category string. Groups stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keywords: Vec<String>,
    pub weight: i32,
}

/// Trending topics ranked at or above `max_rank` earn `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendTier {
    pub max_rank: i32,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub blocklist: Vec<String>,
    pub category_weights: Vec<KeywordWeight>,
    /// Checked in order; first tier whose `max_rank` covers the rank wins.
    pub trend_tiers: Vec<TrendTier>,
    /// Points for a trending topic ranked below every tier.
    pub trend_floor: i32,
    pub fresh_points: i32,
    pub stale_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            blocklist: strings(&[
                "celebrity gossip",
                "movie review",
                "trailer",
                "box office",
                "sports score",
                "cricket match result",
                "big boss",
                "reality show",
                "dating",
                "fashion",
                "horoscope",
            ]),
            category_weights: vec![
                KeywordWeight { keywords: strings(&["politics"]), weight: 20 },
                KeywordWeight { keywords: strings(&["hindu", "culture"]), weight: 15 },
                KeywordWeight { keywords: strings(&["global"]), weight: 10 },
                KeywordWeight { keywords: strings(&["humanity", "social"]), weight: 10 },
            ],
            trend_tiers: vec![
                TrendTier { max_rank: 3, points: 40 },
                TrendTier { max_rank: 5, points: 30 },
            ],
            trend_floor: 20,
            fresh_points: 5,
            stale_points: 1,
        }
    }
}

// =============================================================================
// Enrichment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSuffixRule {
    pub keyword: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetweetRule {
    pub keyword: String,
    pub handles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentRules {
    pub image_suffixes: Vec<ImageSuffixRule>,
    pub default_image_suffix: String,
    pub retweet_handles: Vec<RetweetRule>,
    pub default_handles: Vec<String>,
    /// Language register the quote comment is written in.
    pub comment_register: String,
    pub comment_tone: String,
    pub comment_max_words: u32,
    pub fallback_comment: String,
}

impl Default for EnrichmentRules {
    fn default() -> Self {
        Self {
            image_suffixes: vec![
                suffix("hindu", "temple aerial view high resolution"),
                suffix("politics", "India government official event photo"),
                suffix("global", "India map geopolitics context"),
                suffix("humanity", "relief operation India site photo"),
            ],
            default_image_suffix: "news context image India".to_string(),
            retweet_handles: vec![
                handles("politics", &["@ANI", "@PIB_India", "@PTI_News"]),
                handles("hindu", &["@ANI", "@DDNewsLive", "@Indiaculturenic"]),
                handles("global", &["@ANI", "@ReutersIndia", "@DrSJaishankar"]),
                handles("humanity", &["@ANI", "@NDRFHQ", "@adgpi"]),
            ],
            default_handles: strings(&["@ANI", "@XBreakingIndia"]),
            comment_register: "HINGLISH".to_string(),
            comment_tone: "Nationalist/Deshbhakt".to_string(),
            comment_max_words: 10,
            fallback_comment: "Ye update important hai, zaroor padhein.".to_string(),
        }
    }
}

impl EnrichmentRules {
    /// Image search suffix for a category, or the default suffix.
    pub fn image_suffix(&self, category: Option<&str>) -> &str {
        let category = category.unwrap_or_default().to_lowercase();
        self.image_suffixes
            .iter()
            .find(|rule| category.contains(&rule.keyword.to_lowercase()))
            .map(|rule| rule.suffix.as_str())
            .unwrap_or(self.default_image_suffix.as_str())
    }

    /// First handle of the matching retweet row, or of the default row.
    pub fn retweet_handle(&self, category: Option<&str>) -> &str {
        let category = category.unwrap_or_default().to_lowercase();
        self.retweet_handles
            .iter()
            .find(|rule| category.contains(&rule.keyword.to_lowercase()))
            .map(|rule| rule.handles.as_slice())
            .unwrap_or(self.default_handles.as_slice())
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn suffix(keyword: &str, suffix: &str) -> ImageSuffixRule {
    ImageSuffixRule {
        keyword: keyword.to_string(),
        suffix: suffix.to_string(),
    }
}

fn handles(keyword: &str, list: &[&str]) -> RetweetRule {
    RetweetRule {
        keyword: keyword.to_string(),
        handles: strings(list),
    }
}
