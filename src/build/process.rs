//! Bundler process supervision.
//!
//! # Responsibilities
//! - Spawn the bundler for one side in watch mode
//! - Forward its output into the log, tagged with the side
//! - Report an unexpected exit as a fatal error
//!
//! # Design Decisions
//! - The child is killed when the supervisor is dropped
//! - A shutdown signal stops the child and ends the task cleanly

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::broadcast;

use crate::build::{BuildError, BuildSide};

/// Bundler running in watch mode for one side of the build.
#[derive(Debug, Clone)]
pub struct BundlerProcess {
    side: BuildSide,
    program: String,
    args: Vec<String>,
}

impl BundlerProcess {
    /// `command` is the program followed by its arguments; `None` if empty.
    pub fn new(side: BuildSide, command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            side,
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Run until the bundler exits or shutdown is signalled.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), BuildError> {
        let side = self.side;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BuildError::Spawn { side, source })?;

        tracing::info!(side = %side, program = %self.program, pid = ?child.id(), "Bundler started");

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(side, stdout, false));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(side, stderr, true));
        }

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|source| BuildError::Spawn { side, source })?;
                if status.success() {
                    tracing::info!(side = %side, "Bundler exited");
                    Ok(())
                } else {
                    Err(BuildError::BundlerExited { side, status: status.to_string() })
                }
            }
            _ = shutdown.recv() => {
                tracing::info!(side = %side, "Stopping bundler");
                let _ = child.kill().await;
                Ok(())
            }
        }
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(side: BuildSide, reader: R, is_stderr: bool) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if is_stderr {
            tracing::warn!(side = %side, "{}", line);
        } else {
            tracing::info!(side = %side, "{}", line);
        }
    }
}
