//! External process execution backed by `tokio::process`

use super::traits::{CommandRunner, ProcessResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::{debug, error, info, warn};

/// Runs commands on the local machine and captures their output
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    async fn spawn_and_wait(
        command: &[String],
        working_dir: Option<&Path>,
        stdin: Option<&str>,
    ) -> std::io::Result<std::process::Output> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;

        // fed concurrently with output collection; the child may exit or
        // fill its stdout before draining stdin
        let feed = Self::feed_stdin(child.stdin.take(), stdin);
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        if let Err(e) = fed {
            warn!("⚠️ Could not write stdin: {}", e);
        }
        output
    }

    async fn feed_stdin(pipe: Option<ChildStdin>, payload: Option<&str>) -> std::io::Result<()> {
        let (Some(mut pipe), Some(payload)) = (pipe, payload) else {
            return Ok(());
        };

        let written = match pipe.write_all(payload.as_bytes()).await {
            Ok(()) => pipe.shutdown().await,
            Err(e) => Err(e),
        };

        match written {
            // the child exited without reading everything
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("Child closed stdin early");
                Ok(())
            }
            other => other,
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessExecutor {
    async fn run(
        &self,
        command: &[String],
        working_dir: Option<&Path>,
        stdin: Option<&str>,
    ) -> ProcessResult {
        let command_line = command.join(" ");
        info!("Running command: {}", command_line);
        if let Some(dir) = working_dir {
            debug!("📁 Working directory: {}", dir.display());
        }

        let result = match Self::spawn_and_wait(command, working_dir, stdin).await {
            Ok(output) => ProcessResult::new(
                // killed by a signal
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ),
            Err(e) => ProcessResult::failure(-1, format!("Failed to run '{}': {}", command_line, e)),
        };

        if !result.success {
            error!("Command failed (exit code {}): {}", result.exit_code, command_line);
            error!("stdout: {}", result.stdout.trim_end());
            error!("stderr: {}", result.stderr.trim_end());
        }

        result
    }
}
