use async_trait::async_trait;
use log::debug;
use notebooksite_common::SiteConfig;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{Result, StoreError};
use crate::process;

/// Turns a source notebook into a rendered artifact at `output`.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Runs an external converter as `<command...> <input> --output <output>`.
pub struct NbConvert {
    command: Vec<String>,
    timeout: Option<Duration>,
}

impl NbConvert {
    pub fn new(command: Vec<String>, timeout: Option<Duration>) -> Self {
        Self { command, timeout }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.converter.clone(), config.command_timeout)
    }
}

#[async_trait]
impl Converter for NbConvert {
    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let failed = |reason: String| StoreError::ConversionFailed {
            name: input.display().to_string(),
            reason,
        };

        let Some((program, args)) = self.command.split_first() else {
            return Err(failed("no converter configured".to_string()));
        };

        let mut command = Command::new(program);
        command.args(args).arg(input).arg("--output").arg(output);
        debug!("Running {program} for {}", input.display());

        let result = process::run(command, self.timeout)
            .await
            .map_err(|e| failed(format!("{program}: {e}")))?;
        if !result.status.success() {
            return Err(failed(process::failure_reason(&result)));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn passes_paths_to_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ipynb");
        let output = dir.path().join("out.html");
        std::fs::write(&input, "notebook body").unwrap();

        // sh -c '<script>' $0 $1 $2 -> input --output output
        let converter = NbConvert::new(command(&["sh", "-c", "cat \"$0\" > \"$2\""]), None);
        converter.convert(&input, &output).await.unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "notebook body");
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_conversion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let converter = NbConvert::new(command(&["false"]), None);

        let err = converter
            .convert(&dir.path().join("in.ipynb"), &dir.path().join("out.html"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ConversionFailed { .. }));
    }

    #[tokio::test]
    async fn missing_program_is_a_conversion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let converter = NbConvert::new(command(&["notebooksite-no-such-converter"]), None);

        let err = converter
            .convert(&dir.path().join("in.ipynb"), &dir.path().join("out.html"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ConversionFailed { .. }));
    }

    #[tokio::test]
    async fn slow_converter_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let converter = NbConvert::new(
            command(&["sh", "-c", "sleep 5"]),
            Some(Duration::from_millis(200)),
        );

        let err = converter
            .convert(&dir.path().join("in.ipynb"), &dir.path().join("out.html"))
            .await
            .unwrap_err();

        match err {
            StoreError::ConversionFailed { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
