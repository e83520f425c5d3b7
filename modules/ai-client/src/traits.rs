use async_trait::async_trait;

use crate::error::AiError;

// =============================================================================
// Response Format
// =============================================================================

/// Output shape requested from a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// Backend-enforced JSON (Gemini `responseMimeType`, Ollama `format`).
    Json,
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// A single-shot text generation backend addressed by model identifier.
///
/// Implementations make exactly one request per call. Retrying across models
/// is the caller's job (see [`crate::fallback::first_success`]).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError>;
}
