//! Run configuration
//!
//! One immutable [`LabConfig`] value is built from the CLI arguments and
//! passed by reference to the reconciler and the stage checks. There is no
//! process-wide mutable state.

use std::path::PathBuf;
use std::time::Duration;

/// Default cluster name.
pub const DEFAULT_CLUSTER_NAME: &str = "kube-chaos-lab";
/// Repository-relative path of the kind node-topology file.
pub const DEFAULT_TOPOLOGY_PATH: &str = "infra/kind/cluster.yaml";
/// Repository-relative kustomize directory with the base platform manifests.
pub const DEFAULT_MANIFEST_DIR: &str = "infra/k8s/base";
/// Seconds between poll iterations.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// CoreDNS deployment location and pod selector.
pub const COREDNS_NAMESPACE: &str = "kube-system";
pub const COREDNS_DEPLOYMENT: &str = "coredns";
pub const COREDNS_SELECTOR: &str = "k8s-app=kube-dns";

/// Ingress controller pod location and selector.
pub const INGRESS_NAMESPACE: &str = "ingress-nginx";
pub const INGRESS_SELECTOR: &str = "app.kubernetes.io/component=controller";

/// Smoke-test endpoint exposed by the provisioned ingress layer.
pub const SMOKE_URL: &str = "http://127.0.0.1:8080/";
pub const SMOKE_HOST: &str = "hello.local";
/// Per-request timeout for the smoke probe. An unprogrammed ingress may hold
/// connections open instead of refusing them.
pub const SMOKE_TIMEOUT: Duration = Duration::from_secs(2);

/// Immutable configuration for one convergence run.
#[derive(Debug, Clone)]
pub struct LabConfig {
    /// Name of the kind cluster to reconcile.
    pub cluster_name: String,
    /// Path of the declarative node-topology file.
    pub topology_path: PathBuf,
    /// Kustomize directory applied in the manifest stage.
    pub manifest_dir: PathBuf,
    /// URL probed by the smoke check.
    pub smoke_url: String,
    /// Virtual-host header sent with the smoke probe.
    pub smoke_host: String,
    /// Per-request timeout for the smoke probe.
    pub smoke_timeout: Duration,
    /// Sleep between poll iterations.
    pub poll_interval: Duration,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            topology_path: PathBuf::from(DEFAULT_TOPOLOGY_PATH),
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            smoke_url: SMOKE_URL.to_string(),
            smoke_host: SMOKE_HOST.to_string(),
            smoke_timeout: SMOKE_TIMEOUT,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}
