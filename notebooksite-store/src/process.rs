use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Runs `command` to completion, killing it if `timeout` elapses first.
pub(crate) async fn run(mut command: Command, timeout: Option<Duration>) -> io::Result<Output> {
    command.stdin(Stdio::null()).kill_on_drop(true);
    let output = command.output();
    match timeout {
        Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {}s", limit.as_secs_f64()),
            )
        })?,
        None => output.await,
    }
}

/// One-line description of a failed command for error messages.
pub(crate) fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        format!("exited with {}: {stderr}", output.status)
    }
}
