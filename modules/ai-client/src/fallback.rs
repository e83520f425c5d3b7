//! Ordered model fallback.
//!
//! Providers rename and retire model identifiers often enough that a single
//! hardcoded name is fragile. `first_success` walks a list of candidates,
//! runs one attempt per candidate and returns the first `Ok`. Nothing after
//! the winning candidate is attempted.

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

/// One candidate that was tried and failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub model: String,
    pub error: String,
}

/// The winning attempt plus every failure that preceded it.
#[derive(Debug)]
pub struct FallbackSuccess<T> {
    pub model: String,
    pub value: T,
    pub failures: Vec<FailedAttempt>,
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("no candidate models configured")]
    NoCandidates,

    #[error("all {} candidate models failed: {}", .0.len(), summarize(.0))]
    Exhausted(Vec<FailedAttempt>),
}

impl FallbackError {
    /// Failures in the order they were attempted. Empty for `NoCandidates`.
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            FallbackError::NoCandidates => &[],
            FallbackError::Exhausted(attempts) => attempts,
        }
    }
}

fn summarize(attempts: &[FailedAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.model, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run `attempt` against each candidate in order until one succeeds.
pub async fn first_success<T, E, F, Fut>(
    candidates: &[String],
    mut attempt: F,
) -> Result<FallbackSuccess<T>, FallbackError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    if candidates.is_empty() {
        return Err(FallbackError::NoCandidates);
    }

    let mut failures = Vec::new();
    for model in candidates {
        match attempt(model.clone()).await {
            Ok(value) => {
                debug!(model = %model, skipped = failures.len(), "Fallback candidate succeeded");
                return Ok(FallbackSuccess {
                    model: model.clone(),
                    value,
                    failures,
                });
            }
            Err(e) => {
                warn!(model = %model, error = %e, "Fallback candidate failed");
                failures.push(FailedAttempt {
                    model: model.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Err(FallbackError::Exhausted(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn returns_third_candidate_when_first_two_fail() {
        let calls = Mutex::new(Vec::new());
        let result = first_success(&models(&["a", "b", "c", "d"]), |model| {
            calls.lock().unwrap().push(model.clone());
            async move {
                match model.as_str() {
                    "c" => Ok(format!("from {model}")),
                    _ => Err(format!("{model} unavailable")),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result.model, "c");
        assert_eq!(result.value, "from c");
        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.failures[0].model, "a");
        assert_eq!(result.failures[1].error, "b unavailable");
        // "d" is never tried.
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn first_candidate_success_skips_the_rest() {
        let calls = Mutex::new(0);
        let result = first_success(&models(&["a", "b"]), |_| {
            *calls.lock().unwrap() += 1;
            async { Ok::<_, String>(1) }
        })
        .await
        .unwrap();

        assert_eq!(result.model, "a");
        assert!(result.failures.is_empty());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn all_failures_are_aggregated_in_order() {
        let err = first_success(&models(&["a", "b", "c"]), |model| async move {
            Err::<(), _>(format!("{model} down"))
        })
        .await
        .unwrap_err();

        let attempts = err.attempts();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[2].model, "c");
        let message = err.to_string();
        assert!(message.starts_with("all 3 candidate models failed"));
        assert!(message.contains("b (b down)"));
    }

    #[tokio::test]
    async fn empty_candidate_list_is_an_error() {
        let err = first_success(&[], |_| async { Ok::<_, String>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, FallbackError::NoCandidates));
        assert!(err.attempts().is_empty());
    }
}
