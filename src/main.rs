use anyhow::Context;
use tracing_subscriber::EnvFilter;

use daypat::app::{self, AppState};
use daypat::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, DAYPAT_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("daypat=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting DayPat API in {:?} mode with {:?} store",
        config.environment,
        config.store
    );
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("DAYPAT_JWT_SECRET is not set; every protected request will be rejected");
    }

    let store = app::build_store(&config)
        .await
        .context("failed to open journal store")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, store);
    let router = app::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("DayPat API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
