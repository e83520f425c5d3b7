use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autox_common::AppConfig;
use autox_dashboard::{router, AppState};
use autox_store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;

    let state = Arc::new(AppState {
        posts: Arc::new(store),
    });
    let app = router(state);

    let addr = format!("{}:{}", config.dashboard_host, config.dashboard_port);
    info!("AutoX dashboard API starting on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
