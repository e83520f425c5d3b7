// Store seams for the pipeline stages and the dashboard.
//
// TopicStore covers raw and scored topics, PostStore covers generated posts.
// Both are status-gated: each stage only reads records in the status it owns,
// so reruns never pick up work another stage already advanced.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use autox_common::types::{GeneratedPost, RawTopic, ScoredTopic, TopicStatus, Variant};

// ---------------------------------------------------------------------------
// TopicStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Insert or replace a raw topic keyed by title. Collection order is kept.
    async fn upsert_raw_topic(&self, topic: &RawTopic) -> Result<()>;

    /// Raw topics collected on `date`, in collection order.
    async fn raw_topics_for_date(&self, date: &str) -> Result<Vec<RawTopic>>;

    /// Insert or overwrite a scored topic keyed by `(title, date)`.
    /// A stored `completed` status is never reset.
    async fn upsert_scored_topic(&self, topic: &ScoredTopic) -> Result<()>;

    /// Scored topics in `status`, in insertion order.
    async fn topics_with_status(&self, status: TopicStatus) -> Result<Vec<ScoredTopic>>;

    /// Returns false when no topic matches.
    async fn mark_topic_completed(&self, title: &str, date: &str) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// PostStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: &GeneratedPost) -> Result<()>;

    /// Posts ready for posting that have not been enriched yet.
    async fn pending_enrichment(&self) -> Result<Vec<GeneratedPost>>;

    /// Replace a post's variants and set `enhanced` in one write.
    async fn save_enrichment(&self, id: Uuid, variants: &[Variant]) -> Result<()>;

    /// Posts awaiting manual posting: enhanced first, then oldest first.
    async fn ready_posts(&self) -> Result<Vec<GeneratedPost>>;

    /// Returns false when no post has this id.
    async fn mark_posted(&self, id: Uuid, posted_at: DateTime<Utc>) -> Result<bool>;
}

/// Row counts reported by `autox check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub raw_topics: i64,
    pub top_topics: i64,
    pub final_posts: i64,
    pub ready_posts: i64,
}

impl std::fmt::Display for StoreCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "raw_topics={} top_topics={} final_posts={} ready_for_posting={}",
            self.raw_topics, self.top_topics, self.final_posts, self.ready_posts
        )
    }
}
