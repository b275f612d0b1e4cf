use async_trait::async_trait;
use log::info;
use notebooksite_common::{PullTarget, SiteConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{Result, StoreError};
use crate::process;

/// Fetches and merges `target.remote`/`target.branch` into `target.workdir`.
#[async_trait]
pub trait VersionControl: Send + Sync {
    async fn pull(&self, target: &PullTarget) -> Result<()>;
}

pub struct Git {
    program: String,
    timeout: Option<Duration>,
}

impl Git {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::with_program("git", timeout)
    }

    pub fn with_program(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl VersionControl for Git {
    async fn pull(&self, target: &PullTarget) -> Result<()> {
        let failed = |reason: String| StoreError::UpdateFailed {
            remote: target.remote.clone(),
            branch: target.branch.clone(),
            reason,
        };

        let mut command = Command::new(&self.program);
        command
            .arg("pull")
            .arg(&target.remote)
            .arg(&target.branch)
            .current_dir(&target.workdir);

        let output = process::run(command, self.timeout)
            .await
            .map_err(|e| failed(format!("{}: {e}", self.program)))?;
        if !output.status.success() {
            return Err(failed(process::failure_reason(&output)));
        }
        Ok(())
    }
}

/// The two webhook-driven pulls.
pub struct UpdateTrigger {
    vcs: Arc<dyn VersionControl>,
    sources: PullTarget,
    notebooks: PullTarget,
}

impl UpdateTrigger {
    pub fn new(vcs: Arc<dyn VersionControl>, sources: PullTarget, notebooks: PullTarget) -> Self {
        Self {
            vcs,
            sources,
            notebooks,
        }
    }

    pub fn from_config(config: &SiteConfig, vcs: Arc<dyn VersionControl>) -> Self {
        Self::new(vcs, config.sources.clone(), config.notebooks.clone())
    }

    pub async fn update_sources(&self) -> Result<()> {
        self.pull(&self.sources).await
    }

    pub async fn update_notebooks(&self) -> Result<()> {
        self.pull(&self.notebooks).await
    }

    async fn pull(&self, target: &PullTarget) -> Result<()> {
        info!("Pulling {}/{}", target.remote, target.branch);
        self.vcs.pull(target).await?;
        info!("Pulled {}/{}", target.remote, target.branch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingVcs {
        pulls: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl VersionControl for RecordingVcs {
        async fn pull(&self, target: &PullTarget) -> Result<()> {
            self.pulls
                .lock()
                .unwrap()
                .push(format!("{}/{}", target.remote, target.branch));
            if self.fail {
                return Err(StoreError::UpdateFailed {
                    remote: target.remote.clone(),
                    branch: target.branch.clone(),
                    reason: "rejected".to_string(),
                });
            }
            Ok(())
        }
    }

    fn target(remote: &str) -> PullTarget {
        PullTarget {
            workdir: PathBuf::from("."),
            remote: remote.to_string(),
            branch: "master".to_string(),
        }
    }

    #[tokio::test]
    async fn each_update_pulls_its_own_remote() {
        let vcs = Arc::new(RecordingVcs::default());
        let trigger = UpdateTrigger::new(vcs.clone(), target("origin"), target("notebooks"));

        trigger.update_sources().await.unwrap();
        trigger.update_notebooks().await.unwrap();

        assert_eq!(
            *vcs.pulls.lock().unwrap(),
            ["origin/master", "notebooks/master"]
        );
    }

    #[tokio::test]
    async fn failed_pull_is_reported_once() {
        let vcs = Arc::new(RecordingVcs {
            fail: true,
            ..Default::default()
        });
        let trigger = UpdateTrigger::new(vcs.clone(), target("origin"), target("notebooks"));

        let err = trigger.update_notebooks().await.unwrap_err();

        assert!(matches!(err, StoreError::UpdateFailed { ref remote, .. } if remote == "notebooks"));
        assert_eq!(vcs.pulls.lock().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn git_reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = target("origin");
        target.workdir = dir.path().to_path_buf();

        assert!(Git::with_program("true", None).pull(&target).await.is_ok());
        let err = Git::with_program("false", None).pull(&target).await.unwrap_err();
        assert!(matches!(err, StoreError::UpdateFailed { .. }));
    }
}
