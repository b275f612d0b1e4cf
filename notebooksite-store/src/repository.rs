use glob::{MatchOptions, Pattern, glob_with};
use log::{info, warn};
use notebooksite_common::SiteConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{NotebookEntry, NotebookIndex};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Clone)]
pub struct NotebookRepository {
    notebooks_dir: PathBuf,
    source_ext: String,
}

impl NotebookRepository {
    pub fn new(notebooks_dir: impl Into<PathBuf>, source_ext: impl Into<String>) -> Self {
        Self {
            notebooks_dir: notebooks_dir.into(),
            source_ext: source_ext.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.notebooks_dir(), config.source_ext.clone())
    }

    pub fn notebooks_dir(&self) -> &Path {
        &self.notebooks_dir
    }

    /// Lists every `*.<source_ext>` file directly under the notebooks directory.
    ///
    /// Unreadable directories and entries are left out of the index instead of
    /// failing the caller.
    pub fn scan(&self) -> NotebookIndex {
        let mut index = NotebookIndex::default();

        if !self.notebooks_dir.is_dir() {
            warn!(
                "Notebooks directory '{}' does not exist",
                self.notebooks_dir.display()
            );
            return index;
        }

        let pattern = format!(
            "{}/*.{}",
            Pattern::escape(&self.notebooks_dir.to_string_lossy()),
            Pattern::escape(&self.source_ext)
        );
        let paths = match glob_with(&pattern, MATCH_OPTIONS) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Invalid notebook pattern {pattern}: {e}");
                return index;
            }
        };

        for path in paths {
            let path = match path {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            match entry_for(&path) {
                Some(entry) => index.insert(entry),
                None => warn!("Skipping {path:?}"),
            }
        }

        info!(
            "Indexed {} notebooks in {}",
            index.len(),
            self.notebooks_dir.display()
        );
        index
    }

    /// Runs [`scan`](Self::scan) on the blocking pool.
    pub async fn load(&self) -> NotebookIndex {
        let repository = self.clone();
        tokio::task::spawn_blocking(move || repository.scan())
            .await
            .unwrap_or_else(|e| {
                warn!("Notebook scan did not complete: {e}");
                NotebookIndex::default()
            })
    }
}

fn entry_for(path: &Path) -> Option<NotebookEntry> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    let modified = metadata.modified().ok()?;
    Some(NotebookEntry::new(name, unix_seconds(modified)))
}

pub(crate) fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
