use thiserror::Error;

use crate::util::truncate_to_char_boundary;

/// Error bodies beyond this are cut before they reach logs.
const MAX_ERROR_BODY_BYTES: usize = 500;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

impl AiError {
    pub fn api(status: u16, body: &str) -> Self {
        AiError::Api {
            status,
            body: truncate_to_char_boundary(body, MAX_ERROR_BODY_BYTES).to_string(),
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AiError::Parse(e.to_string())
        } else {
            AiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_body_is_capped() {
        let body = "x".repeat(2_000);
        match AiError::api(503, &body) {
            AiError::Api { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body.len(), MAX_ERROR_BODY_BYTES);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
