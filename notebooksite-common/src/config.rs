use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "NOTEBOOKSITE_";

const NOTEBOOKS_SUBDIR: &str = "notebooks";
const RENDERED_SUBDIR: &str = "_rendered";

/// A remote/branch pair pulled by one of the update webhooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullTarget {
    pub workdir: PathBuf,
    pub remote: String,
    pub branch: String,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub listen: String,
    pub source_ext: String,
    pub output_ext: String,
    /// Converter program followed by its fixed arguments.
    pub converter: Vec<String>,
    pub sources: PullTarget,
    pub notebooks: PullTarget,
    pub home_count: usize,
    /// `None` waits on external commands forever.
    pub command_timeout: Option<Duration>,
}

impl SiteConfig {
    /// Loads `.env` if present, then reads `NOTEBOOKSITE_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let var_or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let root = PathBuf::from(var_or("ROOT", "."));
        let repo_dir = var("REPO_DIR").map(PathBuf::from).unwrap_or_else(|| root.clone());

        let converter: Vec<String> = var_or("CONVERTER", "jupyter nbconvert --to html --template basic")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if converter.is_empty() {
            bail!("{ENV_PREFIX}CONVERTER must name a program");
        }

        let home_count = var_or("HOME_COUNT", "3")
            .parse::<usize>()
            .with_context(|| format!("{ENV_PREFIX}HOME_COUNT must be a non-negative integer"))?;

        let command_timeout = match var("COMMAND_TIMEOUT_SECS") {
            Some(secs) => Some(Duration::from_secs(secs.parse::<u64>().with_context(|| {
                format!("{ENV_PREFIX}COMMAND_TIMEOUT_SECS must be a number of seconds")
            })?)),
            None => None,
        };

        Ok(Self {
            listen: var_or("LISTEN", "0.0.0.0:6000"),
            source_ext: trim_dot(var_or("SOURCE_EXT", "ipynb")),
            output_ext: trim_dot(var_or("OUTPUT_EXT", "html")),
            converter,
            sources: PullTarget {
                workdir: repo_dir.clone(),
                remote: var_or("SOURCES_REMOTE", "origin"),
                branch: var_or("SOURCES_BRANCH", "master"),
            },
            notebooks: PullTarget {
                workdir: repo_dir,
                remote: var_or("NOTEBOOKS_REMOTE", "notebooks"),
                branch: var_or("NOTEBOOKS_BRANCH", "master"),
            },
            home_count,
            command_timeout,
            root,
        })
    }

    pub fn notebooks_dir(&self) -> PathBuf {
        self.root.join(NOTEBOOKS_SUBDIR)
    }

    pub fn rendered_dir(&self) -> PathBuf {
        self.root.join(RENDERED_SUBDIR)
    }
}

fn trim_dot(ext: String) -> String {
    ext.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<SiteConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (format!("{ENV_PREFIX}{k}"), v.to_string()))
            .collect();
        SiteConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.listen, "0.0.0.0:6000");
        assert_eq!(cfg.source_ext, "ipynb");
        assert_eq!(cfg.output_ext, "html");
        assert_eq!(cfg.converter[0], "jupyter");
        assert_eq!(cfg.home_count, 3);
        assert_eq!(cfg.command_timeout, None);
        assert_eq!(cfg.sources.remote, "origin");
        assert_eq!(cfg.notebooks.remote, "notebooks");
        assert_eq!(cfg.notebooks.branch, "master");
        assert_eq!(cfg.notebooks_dir(), PathBuf::from("./notebooks"));
        assert_eq!(cfg.rendered_dir(), PathBuf::from("./_rendered"));
    }

    #[test]
    fn overrides() {
        let cfg = config_from(&[
            ("ROOT", "/srv/site"),
            ("OUTPUT_EXT", ".htm"),
            ("NOTEBOOKS_BRANCH", "main"),
            ("COMMAND_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(cfg.rendered_dir(), PathBuf::from("/srv/site/_rendered"));
        assert_eq!(cfg.output_ext, "htm");
        assert_eq!(cfg.notebooks.workdir, PathBuf::from("/srv/site"));
        assert_eq!(cfg.notebooks.branch, "main");
        assert_eq!(cfg.command_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("HOME_COUNT", "three")]).is_err());
        assert!(config_from(&[("COMMAND_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("CONVERTER", "   ")]).is_err());
    }
}
