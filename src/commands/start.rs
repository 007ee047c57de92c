//! Start command - Converge the lab environment to a known-ready state
//!
//! Runs the fixed six-stage sequence:
//! 1. Reconcile the kind cluster (create, reuse, or recreate)
//! 2. Wait for all declared nodes to be Ready
//! 3. Apply the base platform manifests
//! 4. Wait for CoreDNS to be available, failing fast on stuck pods
//! 5. Wait for the ingress controller pods, failing fast on stuck pods
//! 6. Wait for the ingress endpoint to answer the smoke probe
//!
//! The sequence is strictly ordered and aborts on the first fatal error.
//! Re-running is always safe: stage 1 reuses a healthy cluster untouched.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tracing::info;

use crate::checks;
use crate::cluster::{self, Reconciled};
use crate::config::{
    LabConfig, COREDNS_DEPLOYMENT, COREDNS_NAMESPACE, COREDNS_SELECTOR, DEFAULT_CLUSTER_NAME,
    DEFAULT_MANIFEST_DIR, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TOPOLOGY_PATH, INGRESS_NAMESPACE,
    INGRESS_SELECTOR,
};
use crate::process::{argv, run_checked, CommandRunner, ShellRunner};
use crate::wait::{WaitSpec, Waiter};
use crate::Result;

/// Converge the lab cluster and platform stack
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Name of the kind cluster
    #[arg(long = "name", default_value = DEFAULT_CLUSTER_NAME)]
    pub cluster_name: String,

    /// Path to the kind node-topology file
    #[arg(long = "topology", default_value = DEFAULT_TOPOLOGY_PATH)]
    pub topology: PathBuf,

    /// Kustomize directory with the base platform manifests
    #[arg(long = "manifests", default_value = DEFAULT_MANIFEST_DIR)]
    pub manifests: PathBuf,

    /// Seconds between readiness poll iterations
    #[arg(long = "poll-interval-secs", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,
}

pub async fn run(args: StartArgs) -> Result<()> {
    let config = LabConfig {
        cluster_name: args.cluster_name,
        topology_path: args.topology,
        manifest_dir: args.manifests,
        poll_interval: Duration::from_secs(args.poll_interval_secs),
        ..LabConfig::default()
    };

    execute(&ShellRunner, &config).await
}

/// Run the six-stage convergence sequence against the given runner.
pub async fn execute(runner: &dyn CommandRunner, config: &LabConfig) -> Result<()> {
    info!("[1/6] Reconciling kind cluster '{}'", config.cluster_name);
    let reconciled = cluster::ensure(runner, config).await?;

    let waiter = Waiter::new(WaitSpec {
        poll_interval: config.poll_interval,
    });

    info!("[2/6] Waiting for cluster nodes");
    waiter
        .wait("nodes ready", || {
            checks::nodes_ready(runner, &config.topology_path)
        })
        .await?;

    info!(
        "[3/6] Applying base manifests from {}",
        config.manifest_dir.display()
    );
    checks::apply_base_manifests(runner, &config.manifest_dir).await?;

    info!("[4/6] Waiting for CoreDNS");
    waiter
        .wait_with_fail_fast(
            "coredns available",
            || checks::deployment_available(runner, COREDNS_NAMESPACE, COREDNS_DEPLOYMENT),
            || checks::pod_failure(runner, COREDNS_NAMESPACE, COREDNS_SELECTOR),
        )
        .await?;

    info!("[5/6] Waiting for ingress controller");
    waiter
        .wait_with_fail_fast(
            "ingress controller pods ready",
            || checks::pods_ready(runner, INGRESS_NAMESPACE, INGRESS_SELECTOR),
            || checks::pod_failure(runner, INGRESS_NAMESPACE, INGRESS_SELECTOR),
        )
        .await?;

    info!("[6/6] Waiting for the ingress endpoint");
    let client = reqwest::Client::builder()
        .timeout(config.smoke_timeout)
        .build()?;
    waiter
        .wait("smoke test", || async {
            Ok(checks::http_ready(&client, &config.smoke_url, &config.smoke_host).await)
        })
        .await?;

    print_success(runner, config, reconciled).await
}

async fn print_success(
    runner: &dyn CommandRunner,
    config: &LabConfig,
    reconciled: Reconciled,
) -> Result<()> {
    match reconciled {
        Reconciled::Reused => info!(
            "cluster '{}' already existed and was healthy",
            config.cluster_name
        ),
        Reconciled::Created => info!("cluster '{}' is ready", config.cluster_name),
    }

    let nodes = run_checked(runner, &argv(&["kubectl", "get", "nodes", "-o", "wide"])).await?;
    let table = nodes.stdout.trim();
    if !table.is_empty() {
        println!("{table}");
    }

    info!("lab is ready");
    Ok(())
}
