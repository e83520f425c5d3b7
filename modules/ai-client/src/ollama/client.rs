use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use super::types::*;
use crate::error::AiError;

/// Header that makes ngrok-style tunnels skip their browser interstitial.
pub const BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

pub(crate) struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    bypass_value: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, bypass_value: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            bypass_value: bypass_value.to_string(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(BYPASS_HEADER),
            HeaderValue::from_str(&self.bypass_value)
                .map_err(|e| AiError::Config(format!("invalid bypass header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn tags(&self, timeout: Duration) -> Result<TagsResponse, AiError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::api(status, &body));
        }

        Ok(response.json().await?)
    }

    pub async fn generate(
        &self,
        request: &GenerateRequest<'_>,
        timeout: Duration,
    ) -> Result<GenerateResponse, AiError> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(model = %request.model, "Ollama generate request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::api(status, &body));
        }

        Ok(response.json().await?)
    }
}
