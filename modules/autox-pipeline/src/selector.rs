use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use autox_common::types::{RawTopic, ScoredTopic};
use autox_store::TopicStore;

use crate::scoring::ScoringEngine;
use crate::stats::SelectionStats;

pub const DEFAULT_TOP_K: usize = 5;

/// Picks the day's top topics and upserts them as `approved_for_ai`.
pub struct TopicSelector {
    store: Arc<dyn TopicStore>,
    engine: ScoringEngine,
    top_k: usize,
}

/// Drop blocked titles, score the rest and keep the best `top_k`.
/// Ties keep input order.
pub fn rank_topics(
    engine: &ScoringEngine,
    raw: &[RawTopic],
    run_date: &str,
    top_k: usize,
    created_at: DateTime<Utc>,
) -> (Vec<ScoredTopic>, u32) {
    let mut blocked = 0;
    let mut scored: Vec<ScoredTopic> = Vec::with_capacity(raw.len());

    for topic in raw {
        if engine.is_blocked(&topic.title) {
            debug!(title = %topic.title, "Blocked topic");
            blocked += 1;
            continue;
        }
        let breakdown = engine.score(topic, run_date);
        scored.push(ScoredTopic::approved(topic, breakdown, run_date, created_at));
    }

    // sort_by is stable.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);
    (scored, blocked)
}

impl TopicSelector {
    pub fn new(store: Arc<dyn TopicStore>, engine: ScoringEngine, top_k: usize) -> Self {
        Self {
            store,
            engine,
            top_k,
        }
    }

    pub async fn run(&self, run_date: &str, now: DateTime<Utc>) -> Result<SelectionStats> {
        let raw = self.store.raw_topics_for_date(run_date).await?;
        if raw.is_empty() {
            warn!(date = run_date, "No raw topics found for date, nothing to score");
            return Ok(SelectionStats::default());
        }
        info!(count = raw.len(), date = run_date, "Fetched raw topics");

        let total = raw.len() as u32;
        let (top, blocked) = rank_topics(&self.engine, &raw, run_date, self.top_k, now);

        if top.is_empty() {
            warn!("No viable topics left after filtering");
        }

        for (i, topic) in top.iter().enumerate() {
            info!(rank = i + 1, score = topic.score, title = %topic.title, "Selected topic");
            self.store.upsert_scored_topic(topic).await?;
        }

        Ok(SelectionStats {
            raw_topics: total,
            blocked,
            scored: total - blocked,
            selected: top.into_iter().map(|t| t.title).collect(),
        })
    }
}
