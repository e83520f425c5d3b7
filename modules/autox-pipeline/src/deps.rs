use std::sync::Arc;

use anyhow::{anyhow, Result};
use typed_builder::TypedBuilder;

use ai_client::TextGenerator;
use autox_common::FileConfig;
use autox_store::{PostStore, TopicStore};

use crate::drafting::DraftGenerator;
use crate::enrichment::{EnrichmentPass, QuoteCommenter};
use crate::generation::GenerationStage;
use crate::refinement::Refiner;
use crate::scoring::ScoringEngine;
use crate::selector::TopicSelector;

/// Shared dependency container for the pipeline stages.
///
/// Backends are optional so `score` can run without AI credentials; stages
/// that need a missing backend fail to build.
#[derive(Clone, TypedBuilder)]
pub struct PipelineDeps {
    pub topics: Arc<dyn TopicStore>,
    pub posts: Arc<dyn PostStore>,
    #[builder(default)]
    pub file_config: Arc<FileConfig>,
    #[builder(default, setter(strip_option))]
    pub draft_backend: Option<Arc<dyn TextGenerator>>,
    /// Resolved once per process, usually by model discovery.
    #[builder(default, setter(strip_option, into))]
    pub draft_model: Option<String>,
    /// Serves both refinement and quote comments.
    #[builder(default, setter(strip_option))]
    pub refine_backend: Option<Arc<dyn TextGenerator>>,
}

impl PipelineDeps {
    pub fn selector(&self) -> TopicSelector {
        TopicSelector::new(
            self.topics.clone(),
            ScoringEngine::new(self.file_config.scoring.clone()),
            self.file_config.selection.top_k,
        )
    }

    pub fn generation_stage(&self) -> Result<GenerationStage> {
        let draft_backend = self
            .draft_backend
            .clone()
            .ok_or_else(|| anyhow!("Generation needs a draft backend (set OLLAMA_URL)"))?;
        let draft_model = self
            .draft_model
            .clone()
            .unwrap_or_else(|| self.file_config.models.draft_fallback.clone());
        let refine_backend = self.require_refine_backend()?;

        let generation = &self.file_config.generation;
        Ok(GenerationStage::new(
            self.topics.clone(),
            self.posts.clone(),
            DraftGenerator::new(
                draft_backend,
                draft_model,
                generation.drafts_per_topic,
                generation.voice.clone(),
            ),
            Refiner::new(
                refine_backend,
                self.file_config.models.refinement.clone(),
                generation.language.clone(),
            ),
        ))
    }

    pub fn enrichment_pass(&self) -> Result<EnrichmentPass> {
        let rules = self.file_config.enrichment.clone();
        let commenter = QuoteCommenter::new(
            self.require_refine_backend()?,
            self.file_config.models.comment.clone(),
            &rules,
        );
        Ok(EnrichmentPass::new(self.posts.clone(), rules, commenter))
    }

    fn require_refine_backend(&self) -> Result<Arc<dyn TextGenerator>> {
        self.refine_backend
            .clone()
            .ok_or_else(|| anyhow!("Refinement needs a Gemini backend (set GEMINI_API_KEY)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;
    use autox_store::MemoryStore;

    #[test]
    fn stages_without_backends_fail_to_build() {
        let store = Arc::new(MemoryStore::new());
        let deps = PipelineDeps::builder()
            .topics(store.clone())
            .posts(store)
            .build();

        assert!(deps.generation_stage().is_err());
        assert!(deps.enrichment_pass().is_err());
        let _selector = deps.selector();
    }

    #[test]
    fn full_deps_build_every_stage() {
        let store = Arc::new(MemoryStore::new());
        let backend: Arc<dyn TextGenerator> = Arc::new(ScriptedBackend::new());
        let deps = PipelineDeps::builder()
            .topics(store.clone())
            .posts(store)
            .draft_backend(backend.clone())
            .draft_model("llama3:latest")
            .refine_backend(backend)
            .build();

        assert!(deps.generation_stage().is_ok());
        assert!(deps.enrichment_pass().is_ok());
    }
}
