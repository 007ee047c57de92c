//! Doctor command - Diagnose the local environment
//!
//! Checks that the external tools the convergence sequence shells out to are
//! installed and usable. Purely informational apart from the exit code: any
//! ERR-level finding makes the process exit non-zero.

use std::fmt;

use tracing::debug;

use crate::process::{argv, CommandRunner, ShellRunner};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warn,
    Err,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "OK "),
            CheckStatus::Warn => write!(f, "WRN"),
            CheckStatus::Err => write!(f, "ERR"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
        }
    }
}

pub async fn run() -> Result<()> {
    let results = run_checks(&ShellRunner).await?;
    for result in &results {
        println!("{} {}: {}", result.status, result.name, result.message);
    }

    let failures = results
        .iter()
        .filter(|r| r.status == CheckStatus::Err)
        .count();
    if failures > 0 {
        return Err(Error::Preflight { failures });
    }
    Ok(())
}

pub async fn run_checks(runner: &dyn CommandRunner) -> Result<Vec<CheckResult>> {
    Ok(vec![
        check_command(runner, "git", &["--version"]).await?,
        check_command(runner, "docker", &["--version"]).await?,
        check_docker_daemon(runner).await?,
        check_command(runner, "kubectl", &["version", "--client"]).await?,
        check_command(runner, "kind", &["version"]).await?,
        check_kustomize(runner).await?,
    ])
}

async fn tool_path(runner: &dyn CommandRunner, tool: &str) -> Result<Option<String>> {
    let output = runner.run(&argv(&["which", tool])).await?;
    if !output.success() {
        return Ok(None);
    }
    Ok(Some(output.stdout.trim().to_string()))
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

async fn version_line(runner: &dyn CommandRunner, tool: &str, args: &[&str]) -> Result<String> {
    let mut command = argv(&[tool]);
    command.extend(args.iter().map(|s| s.to_string()));

    let output = runner.run(&command).await?;
    let combined = format!("{}\n{}", output.stdout, output.stderr);
    let line = first_line(&combined);
    if line.is_empty() {
        return Ok("version output not available".to_string());
    }
    Ok(line.to_string())
}

async fn check_command(
    runner: &dyn CommandRunner,
    tool: &str,
    version_args: &[&str],
) -> Result<CheckResult> {
    let Some(path) = tool_path(runner, tool).await? else {
        return Ok(CheckResult::new(tool, CheckStatus::Err, "not found"));
    };

    debug!("{} found at {}", tool, path);
    let version = version_line(runner, tool, version_args).await?;
    Ok(CheckResult::new(
        tool,
        CheckStatus::Ok,
        format!("{path} | {version}"),
    ))
}

async fn check_docker_daemon(runner: &dyn CommandRunner) -> Result<CheckResult> {
    let name = "docker daemon";
    if tool_path(runner, "docker").await?.is_none() {
        return Ok(CheckResult::new(name, CheckStatus::Err, "docker not installed"));
    }

    let output = runner.run(&argv(&["docker", "info"])).await?;
    if output.success() {
        return Ok(CheckResult::new(name, CheckStatus::Ok, "reachable"));
    }

    let detail = first_line(&output.stderr);
    let message = if detail.is_empty() {
        "not reachable (is Docker running?)".to_string()
    } else {
        detail.to_string()
    };
    Ok(CheckResult::new(name, CheckStatus::Err, message))
}

async fn check_kustomize(runner: &dyn CommandRunner) -> Result<CheckResult> {
    if tool_path(runner, "kubectl").await?.is_none() {
        return Ok(CheckResult::new(
            "kubectl kustomize",
            CheckStatus::Err,
            "kubectl not installed",
        ));
    }

    let output = runner
        .run(&argv(&["kubectl", "kustomize", "--help"]))
        .await?;
    if output.success() {
        return Ok(CheckResult::new(
            "kubectl kustomize",
            CheckStatus::Ok,
            "available",
        ));
    }

    if tool_path(runner, "kustomize").await?.is_some() {
        let version = version_line(runner, "kustomize", &["version"]).await?;
        return Ok(CheckResult::new("kustomize", CheckStatus::Ok, version));
    }

    Ok(CheckResult::new(
        "kustomize",
        CheckStatus::Warn,
        "not detected (kubectl kustomize unavailable and kustomize binary not found)",
    ))
}
