use anyhow::{Context, Result};
use notebooksite_api::{AppState, router};
use notebooksite_common::SiteConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = SiteConfig::from_env().context("Failed to load configuration")?;
    info!(
        root = %config.root.display(),
        listen = %config.listen,
        "Starting notebooksite"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    axum::serve(listener, router(AppState::from_config(&config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("notebooksite stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
