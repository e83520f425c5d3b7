use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_client::{Gemini, Ollama, TextGenerator};
use autox_common::{AppConfig, FileConfig};
use autox_pipeline::check::check_ollama;
use autox_pipeline::ingest::{ingest_topics, load_raw_topics};
use autox_pipeline::{run_pipeline, PipelineDeps};
use autox_store::PgStore;

#[derive(Parser)]
#[command(name = "autox", about = "AutoX daily content pipeline")]
#[command(version)]
struct Cli {
    /// Path to config TOML file (overrides AUTOX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run date as YYYY-MM-DD (defaults to today, local time)
    #[arg(long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score today's raw topics and keep the top picks
    Score,

    /// Draft and refine posts for approved topics
    Generate,

    /// Attach image keywords, retweet targets and quote comments
    Enhance,

    /// Score, generate and enhance in order
    Run,

    /// Load raw topics from a JSON file
    Ingest {
        /// JSON array of raw topics
        file: PathBuf,
    },

    /// Show store counts and Ollama reachability
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();
    let run_date = resolve_date(cli.date.as_deref())?;

    let config = AppConfig::from_env()?;
    let config_path = cli.config.clone().or_else(|| config.config_path.clone());
    let file_config = Arc::new(FileConfig::load_or_default(config_path.as_deref())?);

    let store = Arc::new(PgStore::connect(&config.database_url).await?);
    store.migrate().await?;

    let base = || {
        PipelineDeps::builder()
            .topics(store.clone())
            .posts(store.clone())
            .file_config(file_config.clone())
    };

    match cli.command {
        Commands::Score => {
            let stats = base().build().selector().run(&run_date, Utc::now()).await?;
            info!("Selection complete. {stats}");
        }
        Commands::Generate => {
            let (draft, model) = draft_backend(&config, &file_config).await?;
            let deps = base()
                .draft_backend(draft)
                .draft_model(model)
                .refine_backend(gemini_backend(&config, &file_config)?)
                .build();
            let stats = deps.generation_stage()?.run().await?;
            info!("Generation complete. {stats}");
        }
        Commands::Enhance => {
            let deps = base()
                .refine_backend(gemini_backend(&config, &file_config)?)
                .build();
            let stats = deps.enrichment_pass()?.run().await?;
            info!("Enrichment complete. {stats}");
        }
        Commands::Run => {
            let (draft, model) = draft_backend(&config, &file_config).await?;
            let deps = base()
                .draft_backend(draft)
                .draft_model(model)
                .refine_backend(gemini_backend(&config, &file_config)?)
                .build();
            let stats = run_pipeline(&deps, &run_date).await?;
            info!("Pipeline complete. {stats}");
            info!("Start the dashboard with `autox-dashboard` to review posts");
        }
        Commands::Ingest { file } => {
            let topics = load_raw_topics(&file)?;
            let count = ingest_topics(store.as_ref(), &topics).await?;
            info!(count, file = %file.display(), "Ingest complete");
        }
        Commands::Check => {
            let counts = store.counts().await?;
            info!("Store counts: {counts}");
            if counts.ready_posts == 0 {
                warn!("No posts are ready for the dashboard. Run `autox generate` first.");
            }

            match config.ollama_url.as_deref() {
                Some(url) => {
                    let ollama = Ollama::new(url)
                        .with_bypass_value(&file_config.generation.bypass_value)
                        .with_discovery_timeout(file_config.timeouts.discovery());
                    let status = check_ollama(&ollama).await;
                    if status.is_reachable() {
                        info!(url, "Ollama {status}");
                    } else {
                        warn!(url, "Ollama {status}");
                    }
                }
                None => info!("OLLAMA_URL not set, skipping Ollama check"),
            }
        }
    }

    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "autox=info,autox_pipeline=info,autox_store=info,ai_client=info";

/// `RUST_LOG` when set and valid, otherwise info for the workspace crates.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|spec| !spec.trim().is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn resolve_date(date: Option<&str>) -> Result<String> {
    match date {
        Some(d) => {
            let parsed = NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .with_context(|| format!("--date must be YYYY-MM-DD, got {d}"))?;
            Ok(parsed.format("%Y-%m-%d").to_string())
        }
        None => Ok(Local::now().date_naive().format("%Y-%m-%d").to_string()),
    }
}

async fn draft_backend(
    config: &AppConfig,
    file_config: &FileConfig,
) -> Result<(Arc<dyn TextGenerator>, String)> {
    let ollama = Ollama::new(config.require_ollama_url()?)
        .with_bypass_value(&file_config.generation.bypass_value)
        .with_discovery_timeout(file_config.timeouts.discovery())
        .with_generate_timeout(file_config.timeouts.draft());

    let model = ollama.detect_model(&file_config.models.draft_fallback).await;
    info!(model = %model, url = ollama.base_url(), "Using Ollama model");
    Ok((Arc::new(ollama), model))
}

fn gemini_backend(config: &AppConfig, file_config: &FileConfig) -> Result<Arc<dyn TextGenerator>> {
    let mut gemini =
        Gemini::try_new(config.require_gemini_key()?)?.with_timeout(file_config.timeouts.refine());
    if let Some(url) = &config.gemini_base_url {
        gemini = gemini.with_base_url(url.as_str());
    }
    Ok(Arc::new(gemini))
}
