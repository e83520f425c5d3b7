use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use autox_common::types::{GeneratedPost, TopicStatus};
use autox_store::{PostStore, TopicStore};

use crate::drafting::DraftGenerator;
use crate::refinement::Refiner;
use crate::stats::GenerationStats;

/// Drafts and refines every `approved_for_ai` topic into a ready post.
///
/// Backend failures skip the topic and leave it approved for the next run.
/// Store failures abort the stage.
pub struct GenerationStage {
    topics: Arc<dyn TopicStore>,
    posts: Arc<dyn PostStore>,
    drafter: DraftGenerator,
    refiner: Refiner,
}

impl GenerationStage {
    pub fn new(
        topics: Arc<dyn TopicStore>,
        posts: Arc<dyn PostStore>,
        drafter: DraftGenerator,
        refiner: Refiner,
    ) -> Self {
        Self {
            topics,
            posts,
            drafter,
            refiner,
        }
    }

    pub async fn run(&self) -> Result<GenerationStats> {
        let pending = self.topics.topics_with_status(TopicStatus::ApprovedForAi).await?;
        let mut stats = GenerationStats {
            pending: pending.len() as u32,
            ..Default::default()
        };

        if pending.is_empty() {
            info!("No approved topics waiting for generation");
            return Ok(stats);
        }
        info!(count = pending.len(), model = %self.drafter.model(), "Generating posts");

        for topic in pending {
            let raw = match self.drafter.draft(&topic.title).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(topic = %topic.title, error = %e, "Draft failed, skipping topic");
                    stats.draft_failed += 1;
                    continue;
                }
            };

            let refined = match self.refiner.refine(&topic.title, &raw).await {
                Ok(refined) => refined,
                Err(e) => {
                    warn!(topic = %topic.title, error = %e, "Refinement failed, skipping topic");
                    stats.refine_failed += 1;
                    continue;
                }
            };

            let post = GeneratedPost::ready(&topic, refined.value, Utc::now());
            // The post must exist before the topic leaves approved_for_ai.
            self.posts.insert_post(&post).await?;
            self.topics
                .mark_topic_completed(&topic.title, &topic.date)
                .await?;

            info!(
                topic = %topic.title,
                model = %refined.model,
                variants = post.tweet_variants.len(),
                "Post ready"
            );
            stats.generated += 1;
        }

        Ok(stats)
    }
}
