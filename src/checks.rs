//! Convergence gates
//!
//! Each gate is a stateless query against the external system. Gates polled
//! by the waiter report transient conditions (missing objects, unreachable
//! API server, an ingress that resets connections) as a not-done status and
//! never as errors; the one-shot manifest apply is the exception and fails
//! fatally.

use std::path::Path;

use reqwest::header::HOST;
use reqwest::StatusCode;

use crate::kube;
use crate::process::CommandRunner;
use crate::topology;
use crate::wait::StageStatus;
use crate::Result;

/// Container waiting reasons that never resolve on their own.
const TERMINAL_WAIT_REASONS: [&str; 3] =
    ["ImagePullBackOff", "ErrImagePull", "CrashLoopBackOff"];

/// Done when the observed node count matches the declared topology and every
/// node reports a true Ready condition. The topology file is re-read on
/// every evaluation.
pub async fn nodes_ready(
    runner: &dyn CommandRunner,
    topology_path: &Path,
) -> Result<StageStatus> {
    let expected = topology::expected_topology(topology_path)?;

    let Some(nodes) = kube::get_nodes(runner).await? else {
        return Ok(StageStatus::pending(format!(
            "nodes ready: ?/{} (API server not answering)",
            expected.total
        )));
    };

    let observed = nodes.items.len();
    let ready = nodes.items.iter().filter(|n| kube::node_is_ready(n)).count();
    let message = format!("nodes ready: {ready}/{}", expected.total);

    if observed == expected.total && ready == observed {
        Ok(StageStatus::ready(message))
    } else {
        Ok(StageStatus::pending(message))
    }
}

/// One-shot apply of the base platform manifests. Not polled.
pub async fn apply_base_manifests(runner: &dyn CommandRunner, dir: &Path) -> Result<()> {
    kube::apply_kustomize(runner, dir).await
}

/// Done when the deployment has at least one ready and one available
/// replica. This is a "has a working replica" gate, not "all desired
/// replicas available".
pub async fn deployment_available(
    runner: &dyn CommandRunner,
    namespace: &str,
    name: &str,
) -> Result<StageStatus> {
    let Some(deployment) = kube::get_deployment(runner, namespace, name).await? else {
        return Ok(StageStatus::pending(format!(
            "{namespace}/{name}: waiting for deployment object"
        )));
    };

    let status = deployment.status.unwrap_or_default();
    let ready = status.ready_replicas.unwrap_or(0);
    let available = status.available_replicas.unwrap_or(0);
    let message = format!("{namespace}/{name}: {ready} ready, {available} available");

    if ready >= 1 && available >= 1 {
        Ok(StageStatus::ready(message))
    } else {
        Ok(StageStatus::pending(message))
    }
}

/// Done when every pod matching the selector reports a true Ready condition.
/// Zero matching pods means the workload has not been scheduled yet and is
/// treated as not-done.
pub async fn pods_ready(
    runner: &dyn CommandRunner,
    namespace: &str,
    selector: &str,
) -> Result<StageStatus> {
    let Some(pods) = kube::get_pods(runner, namespace, selector).await? else {
        return Ok(StageStatus::pending(format!(
            "pods {selector}: query not answered"
        )));
    };

    if pods.items.is_empty() {
        return Ok(StageStatus::pending(format!(
            "pods {selector}: none scheduled yet"
        )));
    }

    let total = pods.items.len();
    let ready = pods.items.iter().filter(|p| kube::pod_is_ready(p)).count();
    let message = format!("pods {selector}: {ready}/{total} ready");

    if ready == total {
        Ok(StageStatus::ready(message))
    } else {
        Ok(StageStatus::pending(message))
    }
}

/// Fail-fast detector: scans matching pods for containers stuck in a wait
/// state that never resolves on its own. Query and decode failures yield no
/// diagnostic; the polled check sees the same condition and keeps waiting.
pub async fn pod_failure(
    runner: &dyn CommandRunner,
    namespace: &str,
    selector: &str,
) -> Option<String> {
    let pods = kube::get_pods(runner, namespace, selector).await.ok()??;

    for pod in &pods.items {
        let pod_name = pod.metadata.name.as_deref().unwrap_or("<unnamed>");
        let statuses = pod
            .status
            .as_ref()
            .and_then(|s| s.container_statuses.as_deref())
            .unwrap_or(&[]);

        for container in statuses {
            let Some(waiting) = container.state.as_ref().and_then(|s| s.waiting.as_ref())
            else {
                continue;
            };
            let Some(reason) = waiting.reason.as_deref() else {
                continue;
            };
            if TERMINAL_WAIT_REASONS.contains(&reason) {
                return Some(format!(
                    "pod {namespace}/{pod_name}, container {}: {reason}",
                    container.name
                ));
            }
        }
    }

    None
}

/// Smoke probe against the ingress endpoint. Done only on HTTP 200; every
/// transport error, timeout, or other status is not-done because an ingress
/// that is not yet programmed refuses or resets connections transiently.
pub async fn http_ready(client: &reqwest::Client, url: &str, host: &str) -> StageStatus {
    match client.get(url).header(HOST, host).send().await {
        Ok(response) if response.status() == StatusCode::OK => {
            StageStatus::ready(format!("GET {url} ({host}): 200"))
        }
        Ok(response) => StageStatus::pending(format!(
            "GET {url} ({host}): {}",
            response.status().as_u16()
        )),
        Err(_) => StageStatus::pending(format!("GET {url} ({host}): no response")),
    }
}
