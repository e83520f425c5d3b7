//! Reachability check for the tunnelled draft backend.

use ai_client::Ollama;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Reachable { models: Vec<String> },
    Unreachable { error: String },
}

impl BackendStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, BackendStatus::Reachable { .. })
    }
}

impl std::fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendStatus::Reachable { models } if models.is_empty() => {
                write!(f, "reachable, no models installed")
            }
            BackendStatus::Reachable { models } => {
                write!(f, "reachable, models: {}", models.join(", "))
            }
            BackendStatus::Unreachable { error } => write!(f, "unreachable: {error}"),
        }
    }
}

/// Lists installed models; any transport or API failure means unreachable.
pub async fn check_ollama(ollama: &Ollama) -> BackendStatus {
    match ollama.list_models().await {
        Ok(models) => BackendStatus::Reachable { models },
        Err(e) => BackendStatus::Unreachable {
            error: e.to_string(),
        },
    }
}
