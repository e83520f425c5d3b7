mod client;
pub(crate) mod types;

pub use client::BYPASS_HEADER;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::AiError;
use crate::traits::{ResponseFormat, TextGenerator};
use client::OllamaClient;
use types::GenerateRequest;

const DEFAULT_BYPASS_VALUE: &str = "69420";
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

// =============================================================================
// Ollama
// =============================================================================

/// Client for a local or tunnelled Ollama server.
#[derive(Clone)]
pub struct Ollama {
    base_url: String,
    discovery_timeout: Duration,
    generate_timeout: Duration,
    client: Arc<OllamaClient>,
}

impl Ollama {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Arc::new(OllamaClient::new(&base_url, DEFAULT_BYPASS_VALUE)),
            base_url,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
        }
    }

    pub fn with_bypass_value(mut self, value: &str) -> Self {
        self.client = Arc::new(OllamaClient::new(&self.base_url, value));
        self
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the models installed on the server, in server order.
    pub async fn list_models(&self) -> Result<Vec<String>, AiError> {
        let tags = self.client.tags(self.discovery_timeout).await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// First installed model, or `fallback` when discovery fails or finds nothing.
    pub async fn detect_model(&self, fallback: &str) -> String {
        match self.list_models().await {
            Ok(models) => match models.into_iter().next() {
                Some(model) => {
                    info!(model = %model, "Detected Ollama model");
                    model
                }
                None => {
                    warn!(fallback, "Ollama reports no installed models, using fallback");
                    fallback.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, fallback, "Ollama model discovery failed, using fallback");
                fallback.to_string()
            }
        }
    }
}

#[async_trait]
impl TextGenerator for Ollama {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            format: match format {
                ResponseFormat::Json => Some("json"),
                ResponseFormat::Text => None,
            },
        };

        let response = self.client.generate(&request, self.generate_timeout).await?;
        Ok(response.response)
    }
}
