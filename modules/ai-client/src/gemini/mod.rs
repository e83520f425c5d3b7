mod client;
pub(crate) mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{ResponseFormat, TextGenerator};
use client::GeminiClient;
use types::GenerateContentRequest;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Gemini
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: Arc<GeminiClient>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            client: Arc::new(GeminiClient::new(&api_key, DEFAULT_BASE_URL)),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Fails with `AiError::Config` when the key is blank.
    pub fn try_new(api_key: impl Into<String>) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::Config("Gemini API key is empty".to_string()));
        }
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self.client = Arc::new(GeminiClient::new(&self.api_key, &self.base_url));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        let mut request = GenerateContentRequest::from_prompt(prompt);
        if format == ResponseFormat::Json {
            request = request.json_response();
        }

        let response = self
            .client
            .generate_content(model, &request, self.timeout)
            .await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse(format!("Gemini model {model}")))
    }
}
