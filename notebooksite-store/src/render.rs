//! On-disk cache of rendered notebooks.
//!
//! An artifact is reused while its mtime is not older than its notebook's.
//! Renders of the same notebook are serialized: a request that finds another
//! render in flight waits for it, then re-checks freshness and reuses the
//! artifact it produced.

use log::{debug, info};
use notebooksite_common::SiteConfig;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::convert::Converter;
use crate::error::{Result, StoreError};
use crate::model::NotebookIndex;

type Gates = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

pub struct RenderCache {
    notebooks_dir: PathBuf,
    rendered_dir: PathBuf,
    source_ext: String,
    output_ext: String,
    converter: Arc<dyn Converter>,
    in_flight: Gates,
}

impl RenderCache {
    pub fn new(
        notebooks_dir: impl Into<PathBuf>,
        rendered_dir: impl Into<PathBuf>,
        source_ext: impl Into<String>,
        output_ext: impl Into<String>,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            notebooks_dir: notebooks_dir.into(),
            rendered_dir: rendered_dir.into(),
            source_ext: source_ext.into(),
            output_ext: output_ext.into(),
            converter,
            in_flight: Mutex::default(),
        }
    }

    pub fn from_config(config: &SiteConfig, converter: Arc<dyn Converter>) -> Self {
        Self::new(
            config.notebooks_dir(),
            config.rendered_dir(),
            config.source_ext.clone(),
            config.output_ext.clone(),
            converter,
        )
    }

    /// Artifact location for `name`: the trailing `.<source_ext>` is replaced
    /// by `.<output_ext>`, so `a.b.ipynb` renders to `a.b.html`.
    pub fn artifact_path(&self, name: &str) -> Result<PathBuf> {
        let suffix = format!(".{}", self.source_ext);
        let stem = name
            .strip_suffix(&suffix)
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(self
            .rendered_dir
            .join(format!("{stem}.{}", self.output_ext)))
    }

    /// Returns the rendered HTML for `name`, converting it first when the
    /// artifact is missing or older than the notebook.
    pub async fn ensure_rendered(&self, index: &NotebookIndex, name: &str) -> Result<String> {
        let source = self.source_path(index, name).await?;
        let artifact = self.artifact_path(name)?;

        let _gate = InFlight::enter(&self.in_flight, name).await;
        self.refresh(name, &source, &artifact).await
    }

    async fn source_path(&self, index: &NotebookIndex, name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(name) || index.get(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let path = self.notebooks_dir.join(name);
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            _ => Err(StoreError::NotFound(name.to_string())),
        }
    }

    async fn refresh(&self, name: &str, source: &Path, artifact: &Path) -> Result<String> {
        let source_modified = match modified(source).await? {
            Some(time) => time,
            None => return Err(StoreError::NotFound(name.to_string())),
        };

        if let Some(artifact_modified) = modified(artifact).await? {
            if artifact_modified < source_modified {
                info!("Discarding stale render of {name}");
                remove_if_exists(artifact).await?;
            } else {
                debug!("Reusing render of {name}");
            }
        }

        if modified(artifact).await?.is_none() {
            fs::create_dir_all(&self.rendered_dir).await?;
            info!("Rendering {name}");
            self.converter
                .convert(source, artifact)
                .await
                .map_err(|e| match e {
                    StoreError::ConversionFailed { .. } => e,
                    other => StoreError::ConversionFailed {
                        name: name.to_string(),
                        reason: other.to_string(),
                    },
                })?;
        }

        match fs::read(artifact).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::ConversionFailed {
                name: name.to_string(),
                reason: format!("converter produced no {}", artifact.display()),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Holds the per-notebook render lock; drops the map entry once nobody else
/// is waiting on it.
struct InFlight<'a> {
    gates: &'a Gates,
    name: String,
    permit: Option<OwnedMutexGuard<()>>,
}

impl<'a> InFlight<'a> {
    async fn enter(gates: &'a Gates, name: &str) -> InFlight<'a> {
        let gate = gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone();
        let permit = gate.lock_owned().await;
        InFlight {
            gates,
            name: name.to_string(),
            permit: Some(permit),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        drop(self.permit.take());
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        if gates
            .get(&self.name)
            .is_some_and(|gate| Arc::strong_count(gate) == 1)
        {
            gates.remove(&self.name);
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

async fn modified(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(Some(metadata.modified()?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
