// Test mocks for the pipeline stages.
//
// ScriptedBackend (TextGenerator): per-model canned replies or failures,
// recording every call so tests can assert which models were tried and in
// what order. Pair with autox_store::MemoryStore for store-backed stage tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ai_client::{AiError, ResponseFormat, TextGenerator};
use autox_common::types::{RawTopic, ScoreBreakdown, ScoredTopic};

// ---------------------------------------------------------------------------
// ScriptedBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub model: String,
    pub prompt: String,
    pub format: ResponseFormat,
}

/// Unscripted models answer with a 404, like a retired model name.
/// Builder pattern: `.reply()`, `.fail()`, `.reply_when_prompt_contains()`.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: HashMap<String, Reply>,
    prompt_replies: Vec<(String, Reply)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call to `model` returns `text`.
    pub fn reply(mut self, model: &str, text: &str) -> Self {
        self.replies
            .insert(model.to_string(), Reply::Text(text.to_string()));
        self
    }

    /// Every call to `model` fails with a network error.
    pub fn fail(mut self, model: &str, message: &str) -> Self {
        self.replies
            .insert(model.to_string(), Reply::Fail(message.to_string()));
        self
    }

    /// Any model whose prompt contains `needle` returns `text`. Checked
    /// before per-model replies.
    pub fn reply_when_prompt_contains(mut self, needle: &str, text: &str) -> Self {
        self.prompt_replies
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        self.calls.lock().unwrap().push(Call {
            model: model.to_string(),
            prompt: prompt.to_string(),
            format,
        });

        let by_prompt = self
            .prompt_replies
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply);

        match by_prompt.or_else(|| self.replies.get(model)) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Fail(message)) => Err(AiError::Network(message.clone())),
            None => Err(AiError::Api {
                status: 404,
                body: format!("models/{model} is not found"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const TEST_DATE: &str = "2025-01-10";

pub fn raw_topic(title: &str, category: &str) -> RawTopic {
    RawTopic {
        title: title.to_string(),
        category: category.to_string(),
        source_link: format!("https://news.example/{}", title.replace(' ', "-")),
        x_trending: true,
        trend_rank: 1,
        collected_at: TEST_DATE.to_string(),
    }
}

/// An `approved_for_ai` topic as the selector would store it.
pub fn approved_topic(title: &str, category: &str) -> ScoredTopic {
    let breakdown = ScoreBreakdown {
        trend: 40,
        category: 20,
        freshness: 5,
    };
    ScoredTopic::approved(
        &raw_topic(title, category),
        breakdown,
        TEST_DATE,
        chrono::Utc::now(),
    )
}

/// A refinement reply with `n` variants.
pub fn refined_json(n: usize) -> String {
    let variants: Vec<serde_json::Value> = (1..=n)
        .map(|i| {
            serde_json::json!({
                "tweet": format!("Draft {i}: Bharat aage badh raha hai"),
                "type": "standard",
                "hashtags": ["#India"]
            })
        })
        .collect();
    serde_json::json!({ "tweet_variants": variants }).to_string()
}
