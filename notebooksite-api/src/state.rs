use notebooksite_common::SiteConfig;
use notebooksite_store::{
    Converter, Git, NbConvert, NotebookRepository, RenderCache, UpdateTrigger, VersionControl,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: NotebookRepository,
    pub cache: Arc<RenderCache>,
    pub updates: Arc<UpdateTrigger>,
    /// Notebooks shown on the home page.
    pub home_count: usize,
}

impl AppState {
    pub fn new(
        config: &SiteConfig,
        converter: Arc<dyn Converter>,
        vcs: Arc<dyn VersionControl>,
    ) -> Self {
        Self {
            repository: NotebookRepository::from_config(config),
            cache: Arc::new(RenderCache::from_config(config, converter)),
            updates: Arc::new(UpdateTrigger::from_config(config, vcs)),
            home_count: config.home_count,
        }
    }

    /// State wired to the real converter and `git`.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            config,
            Arc::new(NbConvert::from_config(config)),
            Arc::new(Git::new(config.command_timeout)),
        )
    }
}
