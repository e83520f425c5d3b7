// In-memory TopicStore + PostStore for deterministic tests: no Docker.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use autox_common::types::{
    GeneratedPost, PostStatus, RawTopic, ScoredTopic, TopicStatus, Variant,
};

use crate::traits::{PostStore, StoreCounts, TopicStore};

#[derive(Default)]
struct Inner {
    raw: Vec<RawTopic>,
    scored: Vec<ScoredTopic>,
    posts: Vec<GeneratedPost>,
}

/// Vec-backed store that keeps insertion order, mirroring the Postgres
/// `seq`/`id` ordering.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_post_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `insert_post` fail, simulating a store outage.
    pub fn fail_post_inserts(&self, fail: bool) {
        self.fail_post_inserts.store(fail, Ordering::SeqCst);
    }

    pub async fn scored_topics(&self) -> Vec<ScoredTopic> {
        self.inner.lock().await.scored.clone()
    }

    pub async fn posts(&self) -> Vec<GeneratedPost> {
        self.inner.lock().await.posts.clone()
    }

    pub async fn post(&self, id: Uuid) -> Option<GeneratedPost> {
        self.inner.lock().await.posts.iter().find(|p| p.id == id).cloned()
    }

    pub async fn counts(&self) -> StoreCounts {
        let inner = self.inner.lock().await;
        StoreCounts {
            raw_topics: inner.raw.len() as i64,
            top_topics: inner.scored.len() as i64,
            final_posts: inner.posts.len() as i64,
            ready_posts: inner
                .posts
                .iter()
                .filter(|p| p.status == PostStatus::ReadyForPosting)
                .count() as i64,
        }
    }
}

#[async_trait]
impl TopicStore for MemoryStore {
    async fn upsert_raw_topic(&self, topic: &RawTopic) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.raw.iter().position(|t| t.title == topic.title) {
            Some(i) => inner.raw[i] = topic.clone(),
            None => inner.raw.push(topic.clone()),
        }
        Ok(())
    }

    async fn raw_topics_for_date(&self, date: &str) -> Result<Vec<RawTopic>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .raw
            .iter()
            .filter(|t| t.collected_at == date)
            .cloned()
            .collect())
    }

    async fn upsert_scored_topic(&self, topic: &ScoredTopic) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let position = inner
            .scored
            .iter()
            .position(|t| t.title == topic.title && t.date == topic.date);
        match position {
            Some(i) => {
                let status = match inner.scored[i].status {
                    TopicStatus::Completed => TopicStatus::Completed,
                    _ => topic.status,
                };
                inner.scored[i] = ScoredTopic {
                    status,
                    ..topic.clone()
                };
            }
            None => inner.scored.push(topic.clone()),
        }
        Ok(())
    }

    async fn topics_with_status(&self, status: TopicStatus) -> Result<Vec<ScoredTopic>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .scored
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect())
    }

    async fn mark_topic_completed(&self, title: &str, date: &str) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        match inner
            .scored
            .iter_mut()
            .find(|t| t.title == title && t.date == date)
        {
            Some(topic) => {
                topic.status = TopicStatus::Completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: &GeneratedPost) -> Result<()> {
        if self.fail_post_inserts.load(Ordering::SeqCst) {
            bail!("memory store: post inserts disabled");
        }
        let mut inner = self.inner.lock().await;
        if inner.posts.iter().any(|p| p.id == post.id) {
            bail!("duplicate post id {}", post.id);
        }
        inner.posts.push(post.clone());
        Ok(())
    }

    async fn pending_enrichment(&self) -> Result<Vec<GeneratedPost>> {
        let inner = self.inner.lock().await;
        let mut pending: Vec<GeneratedPost> = inner
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::ReadyForPosting && !p.enhanced)
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.generated_at);
        Ok(pending)
    }

    async fn save_enrichment(&self, id: Uuid, variants: &[Variant]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == id) {
            post.tweet_variants = variants.to_vec();
            post.enhanced = true;
        }
        Ok(())
    }

    async fn ready_posts(&self) -> Result<Vec<GeneratedPost>> {
        let inner = self.inner.lock().await;
        let mut ready: Vec<GeneratedPost> = inner
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::ReadyForPosting)
            .cloned()
            .collect();
        ready.sort_by(|a, b| {
            b.enhanced
                .cmp(&a.enhanced)
                .then(a.generated_at.cmp(&b.generated_at))
        });
        Ok(ready)
    }

    async fn mark_posted(&self, id: Uuid, posted_at: DateTime<Utc>) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        match inner.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.status = PostStatus::Posted;
                post.posted_at = Some(posted_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autox_common::types::ScoreBreakdown;
    use chrono::Duration;

    fn raw(title: &str, date: &str) -> RawTopic {
        RawTopic {
            title: title.into(),
            category: "Indian Politics".into(),
            source_link: String::new(),
            x_trending: false,
            trend_rank: 99,
            collected_at: date.into(),
        }
    }

    fn scored(title: &str, score: i32) -> ScoredTopic {
        let breakdown = ScoreBreakdown { trend: 0, category: score, freshness: 0 };
        ScoredTopic::approved(&raw(title, "2025-01-10"), breakdown, "2025-01-10", Utc::now())
    }

    #[tokio::test]
    async fn raw_upsert_keeps_first_position() {
        let store = MemoryStore::new();
        store.upsert_raw_topic(&raw("a", "2025-01-10")).await.unwrap();
        store.upsert_raw_topic(&raw("b", "2025-01-10")).await.unwrap();
        store.upsert_raw_topic(&raw("a", "2025-01-10")).await.unwrap();

        let titles: Vec<_> = store
            .raw_topics_for_date("2025-01-10")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn scored_upsert_overwrites_scores_but_keeps_completed() {
        let store = MemoryStore::new();
        store.upsert_scored_topic(&scored("a", 20)).await.unwrap();
        assert!(store.mark_topic_completed("a", "2025-01-10").await.unwrap());

        store.upsert_scored_topic(&scored("a", 35)).await.unwrap();

        let topics = store.scored_topics().await;
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].score, 35);
        assert_eq!(topics[0].status, TopicStatus::Completed);
    }

    #[tokio::test]
    async fn ready_posts_sort_enhanced_first_then_oldest() {
        let store = MemoryStore::new();
        let topic = scored("a", 20);
        let t0 = Utc::now();

        let old = GeneratedPost::ready(&topic, vec![], t0);
        let newer = GeneratedPost::ready(&topic, vec![], t0 + Duration::minutes(5));
        let newest = GeneratedPost::ready(&topic, vec![], t0 + Duration::minutes(10));
        for post in [&old, &newer, &newest] {
            store.insert_post(post).await.unwrap();
        }
        store.save_enrichment(newest.id, &[]).await.unwrap();

        let ids: Vec<_> = store.ready_posts().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newest.id, old.id, newer.id]);
    }

    #[tokio::test]
    async fn mark_posted_reports_missing_ids() {
        let store = MemoryStore::new();
        let post = GeneratedPost::ready(&scored("a", 20), vec![], Utc::now());
        store.insert_post(&post).await.unwrap();

        assert!(store.mark_posted(post.id, Utc::now()).await.unwrap());
        assert!(!store.mark_posted(Uuid::new_v4(), Utc::now()).await.unwrap());
        assert!(store.ready_posts().await.unwrap().is_empty());
        assert_eq!(store.counts().await.final_posts, 1);
    }
}
