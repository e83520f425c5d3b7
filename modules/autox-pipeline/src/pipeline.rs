use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::deps::PipelineDeps;
use crate::stats::RunStats;

/// Selection, generation, then enrichment. Stops at the first stage that
/// errors; later stages are not started.
pub async fn run_pipeline(deps: &PipelineDeps, run_date: &str) -> Result<RunStats> {
    let generation = deps.generation_stage()?;
    let enrichment = deps.enrichment_pass()?;
    let mut stats = RunStats::default();

    info!(date = run_date, "Stage 1/3: topic selection");
    let started = Instant::now();
    stats.selection = deps
        .selector()
        .run(run_date, Utc::now())
        .await
        .context("Topic selection failed")?;
    stats.durations.push(("selection", started.elapsed()));

    info!("Stage 2/3: post generation");
    let started = Instant::now();
    stats.generation = generation.run().await.context("Post generation failed")?;
    stats.durations.push(("generation", started.elapsed()));

    info!("Stage 3/3: enrichment");
    let started = Instant::now();
    stats.enrichment = enrichment.run().await.context("Enrichment failed")?;
    stats.durations.push(("enrichment", started.elapsed()));

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use autox_common::types::{PostStatus, TopicStatus};
    use autox_store::{MemoryStore, PostStore, TopicStore};

    use crate::testing::{raw_topic, refined_json, ScriptedBackend, TEST_DATE};

    fn deps(store: &Arc<MemoryStore>, refine: ScriptedBackend) -> PipelineDeps {
        PipelineDeps::builder()
            .topics(store.clone())
            .posts(store.clone())
            .draft_backend(Arc::new(ScriptedBackend::new().reply("llama3:latest", "1. Draft")))
            .draft_model("llama3:latest")
            .refine_backend(Arc::new(refine))
            .build()
    }

    #[tokio::test]
    async fn full_run_takes_raw_topics_to_enhanced_posts() {
        let store = Arc::new(MemoryStore::new());
        for (title, category) in [
            ("Budget 2025", "Indian Politics"),
            ("Kumbh Mela", "Hindu Culture"),
            ("Box office record", "Entertainment"),
        ] {
            store.upsert_raw_topic(&raw_topic(title, category)).await.unwrap();
        }
        // Comment prompts don't ask for JSON, so the same model serves both.
        let refine = ScriptedBackend::new()
            .reply("gemini-1.5-flash", &refined_json(2))
            .reply_when_prompt_contains("Quote-Retweet", "Garv ka pal");

        let stats = run_pipeline(&deps(&store, refine), TEST_DATE).await.unwrap();

        assert_eq!(stats.selection.blocked, 1);
        assert_eq!(stats.selection.selected.len(), 2);
        assert_eq!(stats.generation.generated, 2);
        assert_eq!(stats.enrichment.enhanced, 2);
        assert_eq!(stats.enrichment.fallback_comments, 0);
        assert_eq!(stats.durations.len(), 3);

        let ready = store.ready_posts().await.unwrap();
        assert_eq!(ready.len(), 2);
        assert!(ready.iter().all(|p| p.enhanced && p.status == PostStatus::ReadyForPosting));
        assert!(ready
            .iter()
            .flat_map(|p| &p.tweet_variants)
            .all(|v| v.quote_comment.as_deref() == Some("Garv ka pal")));
        assert!(store
            .topics_with_status(TopicStatus::ApprovedForAi)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn store_failure_stops_later_stages() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_raw_topic(&raw_topic("Budget 2025", "Indian Politics")).await.unwrap();
        store.fail_post_inserts(true);
        let refine = ScriptedBackend::new().reply("gemini-1.5-flash", &refined_json(1));

        let err = run_pipeline(&deps(&store, refine), TEST_DATE).await.unwrap_err();

        assert!(err.to_string().contains("Post generation failed"));
        assert!(store.posts().await.is_empty());
    }

    #[tokio::test]
    async fn missing_backend_fails_before_any_stage_runs() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_raw_topic(&raw_topic("Budget 2025", "Indian Politics")).await.unwrap();
        let deps = PipelineDeps::builder()
            .topics(store.clone())
            .posts(store.clone())
            .build();

        assert!(run_pipeline(&deps, TEST_DATE).await.is_err());
        assert!(store.scored_topics().await.is_empty());
    }
}
