//! Typed access to kubectl output
//!
//! Everything the engine knows about the running cluster comes from kubectl
//! queried as JSON and decoded into the k8s-openapi shapes. Query failures
//! and decode failures both surface as `None`: while objects are still being
//! created the control plane can return errors or partial output, and the
//! polled checks treat that as "not ready yet" rather than fatal.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Node, NodeCondition, Pod, PodCondition};
use k8s_openapi::List;

use crate::process::{argv, CommandRunner};
use crate::{Error, Result};

const CONDITION_READY: &str = "Ready";
const STATUS_TRUE: &str = "True";

/// Trait for types that have condition-like fields (type and status)
pub trait HasConditionFields {
    /// Get the condition type field value
    fn type_field(&self) -> &str;
    /// Get the condition status field value
    fn status_field(&self) -> &str;
}

impl HasConditionFields for NodeCondition {
    fn type_field(&self) -> &str {
        &self.type_
    }
    fn status_field(&self) -> &str {
        &self.status
    }
}

impl HasConditionFields for PodCondition {
    fn type_field(&self) -> &str {
        &self.type_
    }
    fn status_field(&self) -> &str {
        &self.status
    }
}

/// Check if a condition list contains a condition with status "True".
pub fn has_condition<T>(conditions: Option<&[T]>, condition_type: &str) -> bool
where
    T: HasConditionFields,
{
    conditions
        .map(|conds| {
            conds
                .iter()
                .any(|c| c.type_field() == condition_type && c.status_field() == STATUS_TRUE)
        })
        .unwrap_or(false)
}

/// Whether the node reports a true Ready condition.
pub fn node_is_ready(node: &Node) -> bool {
    let conditions = node.status.as_ref().and_then(|s| s.conditions.as_deref());
    has_condition(conditions, CONDITION_READY)
}

/// Whether the pod reports a true Ready condition.
pub fn pod_is_ready(pod: &Pod) -> bool {
    let conditions = pod.status.as_ref().and_then(|s| s.conditions.as_deref());
    has_condition(conditions, CONDITION_READY)
}

/// Probe the API server. True when `kubectl cluster-info` exits zero.
pub async fn cluster_reachable(runner: &dyn CommandRunner) -> Result<bool> {
    let output = runner.run(&argv(&["kubectl", "cluster-info"])).await?;
    Ok(output.success())
}

/// Fetch the full node list, or `None` while the query cannot be served.
pub async fn get_nodes(runner: &dyn CommandRunner) -> Result<Option<List<Node>>> {
    let output = runner
        .run(&argv(&["kubectl", "get", "nodes", "-o", "json"]))
        .await?;
    if !output.success() {
        return Ok(None);
    }
    Ok(serde_json::from_str(&output.stdout).ok())
}

/// Fetch one namespaced deployment, or `None` while it does not exist.
pub async fn get_deployment(
    runner: &dyn CommandRunner,
    namespace: &str,
    name: &str,
) -> Result<Option<Deployment>> {
    let output = runner
        .run(&argv(&[
            "kubectl",
            "get",
            "deployment",
            "-n",
            namespace,
            name,
            "-o",
            "json",
        ]))
        .await?;
    if !output.success() {
        return Ok(None);
    }
    Ok(serde_json::from_str(&output.stdout).ok())
}

/// Fetch the pods matching a label selector, or `None` while the query
/// cannot be served. An empty item list is a successful result.
pub async fn get_pods(
    runner: &dyn CommandRunner,
    namespace: &str,
    selector: &str,
) -> Result<Option<List<Pod>>> {
    let output = runner
        .run(&argv(&[
            "kubectl", "get", "pods", "-n", namespace, "-l", selector, "-o", "json",
        ]))
        .await?;
    if !output.success() {
        return Ok(None);
    }
    Ok(serde_json::from_str(&output.stdout).ok())
}

/// One-shot kustomize apply of a manifest directory.
pub async fn apply_kustomize(runner: &dyn CommandRunner, dir: &std::path::Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::apply(format!(
            "manifest directory {} not found",
            dir.display()
        )));
    }

    let mut command = argv(&["kubectl", "apply", "-k"]);
    command.push(dir.display().to_string());

    let output = runner.run(&command).await?;
    if !output.success() {
        return Err(Error::apply(format!(
            "{}: {}",
            command.join(" "),
            output.diagnostic()
        )));
    }
    Ok(())
}
