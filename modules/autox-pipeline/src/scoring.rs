//! Topic scoring.
//!
//! Pure and total over any `RawTopic`. A topic's score is the sum of three
//! parts: trend placement, category keywords, and freshness relative to the
//! run date. Blocked titles never get scored.

use autox_common::rules::ScoringRules;
use autox_common::types::{RawTopic, ScoreBreakdown};

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    rules: ScoringRules,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    /// Zero when not trending, regardless of rank.
    pub fn trend_score(&self, topic: &RawTopic) -> i32 {
        if !topic.x_trending {
            return 0;
        }
        self.rules
            .trend_tiers
            .iter()
            .find(|tier| topic.trend_rank <= tier.max_rank)
            .map(|tier| tier.points)
            .unwrap_or(self.rules.trend_floor)
    }

    /// Stacking keyword scan over a possibly " / "-joined category string.
    pub fn category_score(&self, category: &str) -> i32 {
        let category = category.to_lowercase();
        self.rules
            .category_weights
            .iter()
            .filter(|group| {
                group
                    .keywords
                    .iter()
                    .any(|kw| category.contains(&kw.to_lowercase()))
            })
            .map(|group| group.weight)
            .sum()
    }

    pub fn freshness_score(&self, collected_at: &str, run_date: &str) -> i32 {
        if collected_at == run_date {
            self.rules.fresh_points
        } else {
            self.rules.stale_points
        }
    }

    pub fn is_blocked(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.rules
            .blocklist
            .iter()
            .any(|phrase| title.contains(&phrase.to_lowercase()))
    }

    pub fn score(&self, topic: &RawTopic, run_date: &str) -> ScoreBreakdown {
        ScoreBreakdown {
            trend: self.trend_score(topic),
            category: self.category_score(&topic.category),
            freshness: self.freshness_score(&topic.collected_at, run_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autox_common::rules::KeywordWeight;

    const TODAY: &str = "2025-01-10";

    fn topic(trending: bool, rank: i32) -> RawTopic {
        RawTopic {
            title: "India-China border talks".into(),
            category: "Global".into(),
            source_link: String::new(),
            x_trending: trending,
            trend_rank: rank,
            collected_at: TODAY.into(),
        }
    }

    #[test]
    fn not_trending_scores_zero_at_any_rank() {
        let engine = ScoringEngine::default();
        for rank in [1, 3, 5, 6, 99, -1] {
            assert_eq!(engine.trend_score(&topic(false, rank)), 0);
        }
    }

    #[test]
    fn trend_tiers() {
        let engine = ScoringEngine::default();
        for rank in [1, 2, 3] {
            assert_eq!(engine.trend_score(&topic(true, rank)), 40);
        }
        for rank in [4, 5] {
            assert_eq!(engine.trend_score(&topic(true, rank)), 30);
        }
        for rank in [6, 10, 99] {
            assert_eq!(engine.trend_score(&topic(true, rank)), 20);
        }
    }

    #[test]
    fn category_keywords_stack() {
        let engine = ScoringEngine::default();
        assert_eq!(engine.category_score("Indian Politics / Hindu Culture"), 35);
        assert_eq!(engine.category_score(""), 0);
        assert_eq!(engine.category_score("GLOBAL / Social"), 20);
        // "hindu" and "culture" belong to one group and count once.
        assert_eq!(engine.category_score("Hindu Culture"), 15);
        assert_eq!(
            engine.category_score("Politics / Hindu / Global / Humanity"),
            55
        );
    }

    #[test]
    fn freshness_compares_dates_as_strings() {
        let engine = ScoringEngine::default();
        assert_eq!(engine.freshness_score(TODAY, TODAY), 5);
        assert_eq!(engine.freshness_score("2025-01-09", TODAY), 1);
        assert_eq!(engine.freshness_score("", TODAY), 1);
    }

    #[test]
    fn blocklist_is_case_insensitive_substring() {
        let engine = ScoringEngine::default();
        assert!(engine.is_blocked("Top 10 Box Office hits this week"));
        assert!(engine.is_blocked("Daily HOROSCOPE"));
        assert!(!engine.is_blocked("India-China border talks"));
    }

    #[test]
    fn breakdown_sums_to_total() {
        let engine = ScoringEngine::default();
        let mut raw = topic(true, 2);
        raw.category = "Indian Politics / Hindu Culture".into();
        let breakdown = engine.score(&raw, TODAY);
        assert_eq!(breakdown, ScoreBreakdown { trend: 40, category: 35, freshness: 5 });
        assert_eq!(breakdown.total(), 80);
    }

    #[test]
    fn tables_are_injected() {
        let engine = ScoringEngine::new(ScoringRules {
            blocklist: vec!["ipl".into()],
            category_weights: vec![KeywordWeight {
                keywords: vec!["economy".into()],
                weight: 25,
            }],
            ..ScoringRules::default()
        });
        assert!(engine.is_blocked("IPL auction live"));
        assert!(!engine.is_blocked("Box office record"));
        assert_eq!(engine.category_score("Economy / Politics"), 25);
    }
}
