//! Round-trip tests for the Postgres store.
//!
//! Requirements: Docker (for Postgres via testcontainers)
//!
//! Run with: cargo test -p autox-store --features test-utils --test pg_store_test -- --ignored

#![cfg(feature = "test-utils")]

use chrono::{Duration, Utc};
use uuid::Uuid;

use autox_common::types::{
    GeneratedPost, RawTopic, ScoreBreakdown, ScoredTopic, TopicStatus, Variant,
};
use autox_store::{PostStore, TopicStore};

fn raw(title: &str, date: &str) -> RawTopic {
    RawTopic {
        title: title.into(),
        category: "Global / Humanity".into(),
        source_link: format!("https://news.example/{title}"),
        x_trending: true,
        trend_rank: 4,
        collected_at: date.into(),
    }
}

fn scored(title: &str, category_points: i32) -> ScoredTopic {
    let breakdown = ScoreBreakdown {
        trend: 30,
        category: category_points,
        freshness: 5,
    };
    ScoredTopic::approved(&raw(title, "2025-01-10"), breakdown, "2025-01-10", Utc::now())
}

#[tokio::test]
#[ignore]
async fn raw_topics_filter_by_date_in_collection_order() {
    let (_container, store) = autox_store::testutil::postgres_container().await;

    store.upsert_raw_topic(&raw("b", "2025-01-10")).await.unwrap();
    store.upsert_raw_topic(&raw("old", "2025-01-09")).await.unwrap();
    store.upsert_raw_topic(&raw("a", "2025-01-10")).await.unwrap();

    let titles: Vec<_> = store
        .raw_topics_for_date("2025-01-10")
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["b", "a"]);
}

#[tokio::test]
#[ignore]
async fn scored_upsert_is_idempotent_and_keeps_completed() {
    let (_container, store) = autox_store::testutil::postgres_container().await;

    store.upsert_scored_topic(&scored("a", 10)).await.unwrap();
    store.upsert_scored_topic(&scored("a", 10)).await.unwrap();
    assert_eq!(store.counts().await.unwrap().top_topics, 1);

    assert!(store.mark_topic_completed("a", "2025-01-10").await.unwrap());
    store.upsert_scored_topic(&scored("a", 20)).await.unwrap();

    assert!(store
        .topics_with_status(TopicStatus::ApprovedForAi)
        .await
        .unwrap()
        .is_empty());
    let completed = store.topics_with_status(TopicStatus::Completed).await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].score, 55);
    assert_eq!(completed[0].score_breakdown.category, 20);
}

#[tokio::test]
#[ignore]
async fn post_lifecycle_round_trips_variants() {
    let (_container, store) = autox_store::testutil::postgres_container().await;
    let topic = scored("a", 10);
    let t0 = Utc::now();

    let first = GeneratedPost::ready(
        &topic,
        vec![Variant::new("Jai Hind", "standard", vec!["#India".into()])],
        t0,
    );
    let second = GeneratedPost::ready(&topic, vec![], t0 + Duration::minutes(1));
    store.insert_post(&first).await.unwrap();
    store.insert_post(&second).await.unwrap();

    let pending = store.pending_enrichment().await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].tweet_variants[0].hashtags, vec!["#India"]);
    assert_eq!(pending[0].category.as_deref(), Some("Global / Humanity"));

    let mut enriched = pending[0].tweet_variants.clone();
    enriched[0].quote_comment = Some("Zaroor padhein".into());
    store.save_enrichment(second.id, &[]).await.unwrap();
    store.save_enrichment(first.id, &enriched).await.unwrap();

    assert!(store.pending_enrichment().await.unwrap().is_empty());

    let ready = store.ready_posts().await.unwrap();
    assert_eq!(ready[0].id, first.id);
    assert_eq!(
        ready[0].tweet_variants[0].quote_comment.as_deref(),
        Some("Zaroor padhein")
    );

    assert!(store.mark_posted(first.id, Utc::now()).await.unwrap());
    assert!(!store.mark_posted(Uuid::new_v4(), Utc::now()).await.unwrap());
    let counts = store.counts().await.unwrap();
    assert_eq!(counts.final_posts, 2);
    assert_eq!(counts.ready_posts, 1);
}
