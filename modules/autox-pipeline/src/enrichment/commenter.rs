use std::sync::Arc;

use ai_client::{first_success, strip_quotes, AiError, ResponseFormat, TextGenerator};
use autox_common::rules::EnrichmentRules;
use tracing::warn;

/// A generated comment, or the fallback when every model failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    Generated { text: String, model: String },
    Fallback(String),
}

impl Comment {
    pub fn into_text(self) -> String {
        match self {
            Comment::Generated { text, .. } => text,
            Comment::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Comment::Fallback(_))
    }
}

/// One-line quote-retweet comments. Never fails.
pub struct QuoteCommenter {
    backend: Arc<dyn TextGenerator>,
    models: Vec<String>,
    register: String,
    tone: String,
    max_words: u32,
    fallback: String,
}

impl QuoteCommenter {
    pub fn new(backend: Arc<dyn TextGenerator>, models: Vec<String>, rules: &EnrichmentRules) -> Self {
        Self {
            backend,
            models,
            register: rules.comment_register.clone(),
            tone: rules.comment_tone.clone(),
            max_words: rules.comment_max_words,
            fallback: rules.fallback_comment.clone(),
        }
    }

    pub fn prompt(&self, tweet: &str) -> String {
        format!(
            "Read this tweet: '{}'. Write a 1-line Quote-Retweet comment in {} (Max {} words, {} tone). No hashtags.",
            tweet, self.register, self.max_words, self.tone
        )
    }

    /// Comment text for `tweet`: generated if any model answers, the fallback
    /// sentence otherwise.
    pub async fn comment(&self, tweet: &str) -> String {
        self.comment_detailed(tweet).await.into_text()
    }

    /// Like [`comment`](Self::comment) but reports which path produced it.
    pub async fn comment_detailed(&self, tweet: &str) -> Comment {
        let prompt = self.prompt(tweet);
        let backend = &self.backend;
        let prompt = &prompt;

        let result = first_success(&self.models, |model| async move {
            let reply = backend.generate(&model, prompt, ResponseFormat::Text).await?;
            let cleaned = strip_quotes(&reply);
            if cleaned.is_empty() {
                return Err(AiError::EmptyResponse(format!("comment model {model}")));
            }
            Ok(cleaned)
        })
        .await;

        match result {
            Ok(success) => Comment::Generated {
                text: success.value,
                model: success.model,
            },
            Err(e) => {
                warn!(error = %e, "Quote comment generation failed, using fallback");
                Comment::Fallback(self.fallback.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;

    fn models() -> Vec<String> {
        vec!["gemini-1.5-flash".into(), "gemini-pro".into()]
    }

    fn commenter(backend: ScriptedBackend) -> QuoteCommenter {
        QuoteCommenter::new(Arc::new(backend), models(), &EnrichmentRules::default())
    }

    #[test]
    fn prompt_constrains_register_and_length() {
        let prompt = commenter(ScriptedBackend::new()).prompt("Jai Hind");
        assert_eq!(
            prompt,
            "Read this tweet: 'Jai Hind'. Write a 1-line Quote-Retweet comment in HINGLISH (Max 10 words, Nationalist/Deshbhakt tone). No hashtags."
        );
    }

    #[tokio::test]
    async fn reply_is_cleaned() {
        let c = commenter(ScriptedBackend::new().reply("gemini-1.5-flash", " \"Garv hai Bharat par!\"\n"));
        let comment = c.comment_detailed("x").await;
        assert_eq!(
            comment,
            Comment::Generated {
                text: "Garv hai Bharat par!".into(),
                model: "gemini-1.5-flash".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_reply_falls_through_to_next_model() {
        let backend = ScriptedBackend::new()
            .reply("gemini-1.5-flash", "\"\"")
            .reply("gemini-pro", "Desh aage badhega");
        let c = commenter(backend);
        assert_eq!(c.comment("x").await, "Desh aage badhega");
    }

    #[tokio::test]
    async fn total_failure_returns_fallback() {
        let backend = ScriptedBackend::new().fail("gemini-1.5-flash", "quota exceeded");
        let c = commenter(backend);
        assert!(c.comment_detailed("x").await.is_fallback());
        assert_eq!(c.comment("x").await, "Ye update important hai, zaroor padhein.");
    }

    #[tokio::test]
    async fn no_models_configured_returns_fallback() {
        let c = QuoteCommenter::new(
            Arc::new(ScriptedBackend::new()),
            vec![],
            &EnrichmentRules::default(),
        );
        assert!(c.comment_detailed("x").await.is_fallback());
    }
}
