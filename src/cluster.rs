//! Cluster reconciliation
//!
//! Decides whether the kind cluster is created, reused, or recreated. The
//! health snapshot is a single point-in-time evaluation; an unhealthy
//! cluster is deleted and recreated in full rather than repaired in place.

use tracing::{info, warn};

use crate::config::LabConfig;
use crate::kube;
use crate::process::{argv, run_checked, CommandRunner};
use crate::topology;
use crate::{Error, Result};

/// Whether the reconciler kept an existing cluster or made a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Reused,
    Created,
}

/// Drive the cluster to a healthy state.
///
/// Lists existing clusters; creates the target if absent; otherwise takes a
/// health snapshot and either reuses the cluster untouched or deletes and
/// recreates it. Safe to re-run at any time.
pub async fn ensure(runner: &dyn CommandRunner, config: &LabConfig) -> Result<Reconciled> {
    let name = config.cluster_name.as_str();

    if !cluster_exists(runner, name).await? {
        info!("cluster '{}' not found, creating", name);
        create_cluster(runner, config).await?;
        return Ok(Reconciled::Created);
    }

    if cluster_is_healthy(runner, config).await? {
        info!("cluster '{}' exists and is healthy, reusing", name);
        return Ok(Reconciled::Reused);
    }

    warn!("cluster '{}' exists but is unhealthy, recreating", name);
    delete_cluster(runner, name).await?;
    create_cluster(runner, config).await?;
    Ok(Reconciled::Created)
}

async fn cluster_exists(runner: &dyn CommandRunner, name: &str) -> Result<bool> {
    let output = run_checked(runner, &argv(&["kind", "get", "clusters"]))
        .await
        .map_err(|e| Error::provisioning("listing clusters", e))?;

    Ok(output
        .stdout
        .lines()
        .map(str::trim)
        .any(|line| line == name))
}

/// Point-in-time health snapshot: the API server answers, the node count
/// matches the declared topology, and every node is Ready. Any query or
/// decode failure counts as unhealthy.
async fn cluster_is_healthy(runner: &dyn CommandRunner, config: &LabConfig) -> Result<bool> {
    if !kube::cluster_reachable(runner).await? {
        return Ok(false);
    }

    let expected = topology::expected_topology(&config.topology_path)?;

    let Some(nodes) = kube::get_nodes(runner).await? else {
        return Ok(false);
    };

    let all_ready = nodes.items.iter().all(kube::node_is_ready);
    Ok(nodes.items.len() == expected.total && all_ready)
}

async fn create_cluster(runner: &dyn CommandRunner, config: &LabConfig) -> Result<()> {
    let mut command = argv(&["kind", "create", "cluster", "--name"]);
    command.push(config.cluster_name.clone());
    command.push("--config".to_string());
    command.push(config.topology_path.display().to_string());

    run_checked(runner, &command)
        .await
        .map_err(|e| Error::provisioning("creating cluster", e))?;
    Ok(())
}

async fn delete_cluster(runner: &dyn CommandRunner, name: &str) -> Result<()> {
    let mut command = argv(&["kind", "delete", "cluster", "--name"]);
    command.push(name.to_string());

    run_checked(runner, &command)
        .await
        .map_err(|e| Error::provisioning("deleting cluster", e))?;
    Ok(())
}
