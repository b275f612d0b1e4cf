use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use notebooksite_common::SiteConfig;
use notebooksite_store::{NbConvert, NotebookRepository, RenderCache};
use std::sync::Arc;

// Renders every notebook ahead of time so the first visitor after a pull
// does not wait on the converter.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = SiteConfig::from_env().context("Failed to load configuration")?;
    let repository = NotebookRepository::from_config(&config);
    let cache = RenderCache::from_config(&config, Arc::new(NbConvert::from_config(&config)));

    let index = repository.load().await;
    if index.is_empty() {
        warn!(
            "No notebooks found in '{}'",
            repository.notebooks_dir().display()
        );
        return Ok(());
    }

    let progress = ProgressBar::new(index.len() as u64);
    progress.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);

    let mut failures = 0usize;
    for entry in index.recent(index.len()) {
        progress.set_message(entry.name.clone());
        if let Err(e) = cache.ensure_rendered(&index, &entry.name).await {
            progress.suspend(|| error!("{e}"));
            failures += 1;
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if failures > 0 {
        bail!("{failures} of {} notebooks failed to render", index.len());
    }
    info!("Rendered {} notebooks.", index.len());
    Ok(())
}
