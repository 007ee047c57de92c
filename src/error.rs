//! Error types for the CLI

use crate::process::CommandOutput;

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
///
/// Fatal conditions only. Transient not-ready states are never errors; they
/// are reported as a not-done status by the readiness checks and polled
/// again.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external command exited non-zero. Carries the exact argv and both
    /// captured streams so the boundary can print a useful diagnostic.
    #[error("command failed: {}\n{}", .argv.join(" "), .output.diagnostic())]
    Command {
        argv: Vec<String>,
        output: CommandOutput,
    },

    #[error("invalid topology: {message}")]
    Configuration { message: String },

    /// Cluster list/create/delete failed. Labels the failing step and wraps
    /// the underlying command diagnostic.
    #[error("{step} failed: {source}")]
    Provisioning {
        step: String,
        #[source]
        source: Box<Error>,
    },

    #[error("manifest apply failed: {message}")]
    Apply { message: String },

    /// The fail-fast pod detector fired. Aborts the active wait immediately.
    #[error("pod failure detected: {0}")]
    PodFailure(String),

    #[error("environment not ready: {failures} check(s) failed")]
    Preflight { failures: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn provisioning(step: impl Into<String>, source: Error) -> Self {
        Error::Provisioning {
            step: step.into(),
            source: Box::new(source),
        }
    }

    pub fn apply(message: impl Into<String>) -> Self {
        Error::Apply {
            message: message.into(),
        }
    }
}
