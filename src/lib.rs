//! labctl library
//!
//! Converges a local kind lab environment to a known-ready state: one
//! idempotent reconciliation of the cluster itself, then a fixed sequence of
//! readiness gates built on a single generic polling primitive.

pub mod checks;
pub mod cluster;
pub mod commands;
pub mod config;
pub mod error;
pub mod kube;
pub mod process;
pub mod topology;
pub mod wait;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

/// labctl - Local kind lab bootstrap
#[derive(Parser, Debug)]
#[command(name = "labctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converge the lab cluster and platform stack
    Start(commands::start::StartArgs),
    /// Diagnose the local environment
    Doctor,
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Start(args) => commands::start::run(args).await,
            Commands::Doctor => commands::doctor::run().await,
        }
    }
}
