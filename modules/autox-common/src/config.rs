use std::path::PathBuf;

use crate::error::AutoxError;

/// Application configuration loaded from environment variables.
/// Contains only secrets and env-specific values; models, rule tables and
/// timeouts live in the TOML FileConfig.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Database
    pub database_url: String,

    // AI backends
    pub ollama_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,

    // TOML config path
    pub config_path: Option<PathBuf>,

    // Dashboard
    pub dashboard_host: String,
    pub dashboard_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AutoxError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AutoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| AutoxError::Config("DATABASE_URL environment variable is required".into()))?;

        let dashboard_port = match var("DASHBOARD_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| AutoxError::Config(format!("DASHBOARD_PORT must be a number, got {port}")))?,
            None => 8000,
        };

        Ok(Self {
            database_url,
            ollama_url: var("OLLAMA_URL").map(|url| url.trim_end_matches('/').to_string()),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_base_url: var("GEMINI_BASE_URL"),
            config_path: var("AUTOX_CONFIG").map(PathBuf::from),
            dashboard_host: var("DASHBOARD_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            dashboard_port,
        })
    }

    pub fn require_ollama_url(&self) -> Result<&str, AutoxError> {
        self.ollama_url
            .as_deref()
            .ok_or_else(|| AutoxError::Config("OLLAMA_URL environment variable is required".into()))
    }

    pub fn require_gemini_key(&self) -> Result<&str, AutoxError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| AutoxError::Config("GEMINI_API_KEY environment variable is required".into()))
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  OLLAMA_URL: {}", self.ollama_url.as_deref().unwrap_or("<not set>"));
        tracing::info!("  GEMINI_API_KEY: {}", preview_opt(&self.gemini_api_key));
        tracing::info!(
            "  AUTOX_CONFIG: {}",
            self.config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<defaults>".to_string())
        );
    }
}
