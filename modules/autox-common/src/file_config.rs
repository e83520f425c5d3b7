use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::rules::{EnrichmentRules, ScoringRules};

/// TOML-backed configuration loaded from disk.
/// Secrets (API keys, DB URL) stay as env vars. Every section is optional and
/// defaults to the built-in values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub models: ModelsConfig,
    pub selection: SelectionConfig,
    pub generation: GenerationConfig,
    pub scoring: ScoringRules,
    pub enrichment: EnrichmentRules,
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Used when the draft backend cannot list its installed models.
    pub draft_fallback: String,
    /// Tried in order for refinement.
    pub refinement: Vec<String>,
    /// Tried in order for quote comments.
    pub comment: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let gemini = vec![
            "gemini-1.5-flash".to_string(),
            "gemini-1.5-flash-001".to_string(),
            "gemini-pro".to_string(),
        ];
        Self {
            draft_fallback: "llama3:latest".to_string(),
            refinement: gemini.clone(),
            comment: gemini,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub top_k: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub drafts_per_topic: u32,
    /// Style of the drafts, e.g. "Hinglish nationalist".
    pub voice: String,
    /// Language named in the refinement prompt.
    pub language: String,
    /// Value of the tunnel bypass header sent to the draft backend.
    pub bypass_value: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            drafts_per_topic: 3,
            voice: "Hinglish nationalist".to_string(),
            language: "Hinglish".to_string(),
            bypass_value: "69420".to_string(),
        }
    }
}

/// Per-call timeouts, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub discovery_secs: u64,
    pub draft_secs: u64,
    pub refine_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            discovery_secs: 10,
            draft_secs: 120,
            refine_secs: 60,
        }
    }
}

impl TimeoutsConfig {
    pub fn discovery(&self) -> Duration {
        Duration::from_secs(self.discovery_secs)
    }

    pub fn draft(&self) -> Duration {
        Duration::from_secs(self.draft_secs)
    }

    pub fn refine(&self) -> Duration {
        Duration::from_secs(self.refine_secs)
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

impl FileConfig {
    /// Load from `path` if given, otherwise use the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.selection.top_k, 5);
        assert_eq!(config.models.draft_fallback, "llama3:latest");
        assert_eq!(config.models.refinement.len(), 3);
        assert_eq!(config.scoring, ScoringRules::default());
        assert_eq!(config.timeouts.draft(), Duration::from_secs(120));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [selection]
            top_k = 3

            [models]
            refinement = ["gemini-2.0-flash"]

            [enrichment]
            fallback_comment = "Zaroor dekhiye."
            "#,
        )
        .unwrap();
        assert_eq!(config.selection.top_k, 3);
        assert_eq!(config.models.refinement, vec!["gemini-2.0-flash"]);
        assert_eq!(config.models.comment.len(), 3);
        assert_eq!(config.enrichment.fallback_comment, "Zaroor dekhiye.");
        assert_eq!(config.enrichment.comment_max_words, 10);
    }

    #[test]
    fn scoring_tables_are_data() {
        let config: FileConfig = toml::from_str(
            r#"
            [scoring]
            blocklist = ["ipl auction"]

            [[scoring.category_weights]]
            keywords = ["economy"]
            weight = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.blocklist, vec!["ipl auction"]);
        assert_eq!(config.scoring.category_weights.len(), 1);
        assert_eq!(config.scoring.category_weights[0].weight, 25);
        assert_eq!(config.scoring.fresh_points, 5);
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<FileConfig>("[graph]\nuri = \"x\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error_with_path() {
        let err = load_config(Path::new("/nonexistent/autox.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/autox.toml"));
    }
}
