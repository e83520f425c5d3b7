//! Post-generation enrichment.
//!
//! Fills `image_keyword`, `retweet_suggestion` and `quote_comment` on every
//! variant of each ready, unenriched post, then writes the variants back and
//! sets `enhanced` in a single update. Rule-table lookups use the post's
//! category; comments come from [`QuoteCommenter`] and cannot fail.

pub mod commenter;

pub use commenter::{Comment, QuoteCommenter};

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use autox_common::rules::EnrichmentRules;
use autox_common::types::Variant;
use autox_store::PostStore;

use crate::stats::EnrichmentStats;

/// Title reduced to alphanumerics and whitespace, followed by `suffix`.
pub fn image_keyword(title: &str, suffix: &str) -> String {
    let clean: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    format!("{clean} {suffix}")
}

pub struct EnrichmentPass {
    posts: Arc<dyn PostStore>,
    rules: EnrichmentRules,
    commenter: QuoteCommenter,
}

impl EnrichmentPass {
    pub fn new(posts: Arc<dyn PostStore>, rules: EnrichmentRules, commenter: QuoteCommenter) -> Self {
        Self {
            posts,
            rules,
            commenter,
        }
    }

    pub async fn run(&self) -> Result<EnrichmentStats> {
        let pending = self.posts.pending_enrichment().await?;
        let mut stats = EnrichmentStats {
            pending: pending.len() as u32,
            ..Default::default()
        };

        if pending.is_empty() {
            info!("No posts waiting for enrichment");
            return Ok(stats);
        }
        info!(count = pending.len(), "Enriching posts");

        for post in pending {
            if post.tweet_variants.is_empty() {
                debug!(topic = %post.topic, "Post has no variants, skipping");
                stats.skipped_empty += 1;
                continue;
            }

            let category = post.category.as_deref();
            let image = image_keyword(&post.topic, self.rules.image_suffix(category));
            let retweet = self.rules.retweet_handle(category).to_string();

            let mut enriched = Vec::with_capacity(post.tweet_variants.len());
            for variant in post.tweet_variants {
                let comment = self.commenter.comment_detailed(&variant.tweet).await;
                if comment.is_fallback() {
                    stats.fallback_comments += 1;
                }
                enriched.push(Variant {
                    image_keyword: Some(image.clone()),
                    retweet_suggestion: Some(retweet.clone()),
                    quote_comment: Some(comment.into_text()),
                    ..variant
                });
            }

            self.posts.save_enrichment(post.id, &enriched).await?;
            info!(topic = %post.topic, variants = enriched.len(), "Post enhanced");
            stats.variants += enriched.len() as u32;
            stats.enhanced += 1;
        }

        Ok(stats)
    }
}
