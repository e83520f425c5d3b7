pub mod config;
pub mod error;
pub mod file_config;
pub mod rules;
pub mod types;

pub use config::AppConfig;
pub use error::AutoxError;
pub use file_config::{load_config, FileConfig};
pub use rules::{EnrichmentRules, ScoringRules};
pub use types::*;
