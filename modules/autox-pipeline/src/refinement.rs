//! Structured refinement of free-form drafts.
//!
//! The refinement backend is asked for JSON in the shape of [`RefinedDrafts`]
//! and each candidate model is tried in order until one reply both arrives
//! and validates. A reply that parses but fails validation counts as a failed
//! attempt, same as a transport error.

use std::sync::Arc;

use ai_client::{
    first_success, strip_code_blocks, AiError, FallbackError, FallbackSuccess, ResponseFormat,
    StructuredOutput, TextGenerator,
};
use autox_common::types::{Variant, DEFAULT_VARIANT_TYPE};
use schemars::JsonSchema;
use serde::Deserialize;

/// Expected top-level shape of a refinement reply.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RefinedDrafts {
    pub tweet_variants: Vec<DraftVariant>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DraftVariant {
    /// Final tweet text.
    pub tweet: String,
    /// Variant style, e.g. "standard", "emotional", "factual".
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl From<DraftVariant> for Variant {
    fn from(d: DraftVariant) -> Self {
        let kind = d
            .kind
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_VARIANT_TYPE.to_string());
        Variant::new(d.tweet.trim(), kind, d.hashtags)
    }
}

/// Parse and validate one refinement reply.
pub fn parse_refined(reply: &str) -> Result<Vec<Variant>, AiError> {
    let refined: RefinedDrafts = serde_json::from_str(strip_code_blocks(reply))?;

    if let Some(i) = refined
        .tweet_variants
        .iter()
        .position(|v| v.tweet.trim().is_empty())
    {
        return Err(AiError::Parse(format!("variant {i} has an empty tweet")));
    }

    Ok(refined.tweet_variants.into_iter().map(Variant::from).collect())
}

pub struct Refiner {
    backend: Arc<dyn TextGenerator>,
    models: Vec<String>,
    language: String,
}

impl Refiner {
    pub fn new(
        backend: Arc<dyn TextGenerator>,
        models: Vec<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            models,
            language: language.into(),
        }
    }

    pub fn prompt(&self, title: &str, raw: &str) -> String {
        format!(
            "Refine these {} tweet drafts for '{}' into strict JSON. Raw Text: {}\n\n{}",
            self.language,
            title,
            raw,
            RefinedDrafts::schema_instructions()
        )
    }

    /// First model whose reply validates wins; later models are not called.
    pub async fn refine(
        &self,
        title: &str,
        raw: &str,
    ) -> Result<FallbackSuccess<Vec<Variant>>, FallbackError> {
        let prompt = self.prompt(title, raw);
        let backend = &self.backend;
        let prompt = &prompt;

        first_success(&self.models, |model| async move {
            let reply = backend
                .generate(&model, prompt, ResponseFormat::Json)
                .await?;
            parse_refined(&reply)
        })
        .await
    }
}
