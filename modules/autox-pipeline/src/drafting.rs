use std::sync::Arc;

use ai_client::{AiError, ResponseFormat, TextGenerator};
use tracing::debug;

/// Free-form drafts from the local model.
pub struct DraftGenerator {
    backend: Arc<dyn TextGenerator>,
    model: String,
    drafts_per_topic: u32,
    voice: String,
}

impl DraftGenerator {
    pub fn new(
        backend: Arc<dyn TextGenerator>,
        model: impl Into<String>,
        drafts_per_topic: u32,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            drafts_per_topic,
            voice: voice.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self, title: &str) -> String {
        format!(
            "Write {} {} tweets for: {}",
            self.drafts_per_topic, self.voice, title
        )
    }

    /// One request, no retry. A blank reply is an error.
    pub async fn draft(&self, title: &str) -> Result<String, AiError> {
        let text = self
            .backend
            .generate(&self.model, &self.prompt(title), ResponseFormat::Text)
            .await?;
        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse(format!("draft model {}", self.model)));
        }
        debug!(model = %self.model, chars = text.len(), "Draft received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;

    #[test]
    fn prompt_names_count_voice_and_title() {
        let drafter = DraftGenerator::new(
            Arc::new(ScriptedBackend::new()),
            "llama3:latest",
            3,
            "Hinglish nationalist",
        );
        assert_eq!(
            drafter.prompt("Chandrayaan-4 launch"),
            "Write 3 Hinglish nationalist tweets for: Chandrayaan-4 launch"
        );
    }

    #[tokio::test]
    async fn blank_reply_is_empty_response() {
        let backend = Arc::new(ScriptedBackend::new().reply("llama3:latest", "   \n"));
        let drafter = DraftGenerator::new(backend, "llama3:latest", 3, "Hinglish nationalist");
        let err = drafter.draft("x").await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn draft_uses_configured_model_in_text_mode() {
        let backend = Arc::new(ScriptedBackend::new().reply("mistral:7b", "1. Jai Hind"));
        let drafter = DraftGenerator::new(backend.clone(), "mistral:7b", 3, "Hinglish nationalist");

        assert_eq!(drafter.draft("x").await.unwrap(), "1. Jai Hind");
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "mistral:7b");
        assert_eq!(calls[0].format, ResponseFormat::Text);
    }
}
