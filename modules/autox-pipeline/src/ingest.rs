use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use autox_common::types::RawTopic;
use autox_common::AutoxError;
use autox_store::TopicStore;

/// Parse a JSON array of raw topics. Every topic needs a title and a
/// collection date.
pub fn parse_raw_topics(json: &str) -> Result<Vec<RawTopic>> {
    let topics: Vec<RawTopic> =
        serde_json::from_str(json).context("Raw topics must be a JSON array of topic objects")?;

    for (i, topic) in topics.iter().enumerate() {
        if topic.title.trim().is_empty() {
            return Err(AutoxError::Validation(format!("topic {i} has an empty title")).into());
        }
        if topic.collected_at.trim().is_empty() {
            return Err(AutoxError::Validation(format!(
                "topic {i} ({}) has no collected_at date",
                topic.title
            ))
            .into());
        }
    }

    Ok(topics)
}

pub fn load_raw_topics(path: &Path) -> Result<Vec<RawTopic>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read topics file: {}", path.display()))?;
    parse_raw_topics(&content).with_context(|| format!("Invalid topics file: {}", path.display()))
}

/// Upsert each topic by title, in file order.
pub async fn ingest_topics(store: &dyn TopicStore, topics: &[RawTopic]) -> Result<usize> {
    for topic in topics {
        store.upsert_raw_topic(topic).await?;
    }
    info!(count = topics.len(), "Raw topics ingested");
    Ok(topics.len())
}
