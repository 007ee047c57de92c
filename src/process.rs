//! External command execution
//!
//! One spawned process per call, both streams captured. A non-zero exit is a
//! normal, inspectable outcome at this layer; `run_checked` is the raising
//! variant for callers that treat non-zero as fatal. No retry and no timeout
//! here, that policy belongs to callers.

use std::io;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;

use crate::{Error, Result};

/// Captured result of one external command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Human-readable failure detail: stderr if non-empty, else stdout,
    /// else a placeholder.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        "unknown error".to_string()
    }
}

/// Trait abstracting external command execution for testability.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Spawn the command and capture its output. Only spawn-level failures
    /// error; a non-zero exit comes back as a normal `CommandOutput`.
    async fn run(&self, argv: &[String]) -> Result<CommandOutput>;
}

/// Command runner that spawns real processes.
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let output = Command::new(program).args(args).output().await?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run a command and fail with [`Error::Command`] on non-zero exit.
pub async fn run_checked(runner: &dyn CommandRunner, argv: &[String]) -> Result<CommandOutput> {
    let output = runner.run(argv).await?;
    if !output.success() {
        return Err(Error::Command {
            argv: argv.to_vec(),
            output,
        });
    }
    Ok(output)
}

/// Build an owned argv from string literals.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
