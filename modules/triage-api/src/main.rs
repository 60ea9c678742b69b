use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use triage_api::{build_router, cors_layer, AppState};
use triage_common::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("triage=info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    let file_config = config.file_config()?;

    let cors = cors_layer(&config.origins_with(&file_config))?;
    let state = Arc::new(AppState::from_config(&file_config));
    let app = build_router(state, cors);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(
        seed = file_config.clustering.seed,
        restarts = file_config.clustering.restarts,
        "Triage engine starting on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
