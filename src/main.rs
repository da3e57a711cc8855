use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod history;
mod state;
mod videos;
mod youtube;

#[cfg(test)]
mod test_support;

use crate::{config::AppConfig, state::AppState, youtube::RapidApiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "vidseek=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(environment = ?config.environment, "configuration loaded");

    if config.youtube.api_key.is_none() || config.youtube.api_host.is_none() {
        tracing::warn!("X_RAPIDAPI_KEY or X_RAPIDAPI_HOST is not set; video search will fail");
    }

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let youtube = Arc::new(RapidApiClient::new(&config.youtube)?);
    let (host, port) = (config.host.clone(), config.port);
    let state = AppState::from_parts(config, db.clone(), youtube);

    let app = app::build_app(state)?;
    app::serve(app, &host, port).await?;

    db.close().await;
    tracing::info!("database pool closed");
    Ok(())
}
