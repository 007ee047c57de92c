//! Expected cluster topology
//!
//! The kind cluster config is ground truth for how many nodes should exist.
//! It is re-read on every call; the file is externally owned and nothing
//! here caches it.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

const CONTROL_PLANE_ROLE: &str = "control-plane";
const WORKER_ROLE: &str = "worker";

/// Declared node counts from the kind cluster config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub total: usize,
    pub control_plane: usize,
    pub workers: usize,
}

#[derive(Debug, Deserialize)]
struct ClusterDoc {
    nodes: Option<Vec<NodeEntry>>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    role: Option<String>,
}

/// Read the expected topology from a kind cluster config file.
///
/// Fails with a configuration error if the file is missing, unreadable, or
/// has no `nodes` list. Nodes with a role other than `control-plane` or
/// `worker` count toward the total but neither sub-count.
pub fn expected_topology(path: &Path) -> Result<Topology> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_topology(&raw)
        .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
}

fn parse_topology(raw: &str) -> std::result::Result<Topology, String> {
    let doc: ClusterDoc =
        serde_yaml::from_str(raw).map_err(|e| format!("not a cluster config: {e}"))?;
    let nodes = doc.nodes.ok_or_else(|| "no nodes list".to_string())?;

    let control_plane = nodes
        .iter()
        .filter(|n| n.role.as_deref() == Some(CONTROL_PLANE_ROLE))
        .count();
    let workers = nodes
        .iter()
        .filter(|n| n.role.as_deref() == Some(WORKER_ROLE))
        .count();

    Ok(Topology {
        total: nodes.len(),
        control_plane,
        workers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(raw: &str) -> Topology {
        parse_topology(raw).unwrap()
    }

    #[test]
    fn counts_roles() {
        let topology = parse(
            "kind: Cluster\n\
             nodes:\n\
             - role: control-plane\n\
             - role: worker\n\
             - role: worker\n",
        );
        assert_eq!(
            topology,
            Topology {
                total: 3,
                control_plane: 1,
                workers: 2
            }
        );
    }

    #[test]
    fn counts_are_order_independent() {
        let forward = parse("nodes:\n- role: control-plane\n- role: worker\n- role: worker\n");
        let reversed = parse("nodes:\n- role: worker\n- role: worker\n- role: control-plane\n");
        assert_eq!(forward, reversed);
    }

    #[test]
    fn unknown_roles_count_toward_total_only() {
        let topology = parse(
            "nodes:\n\
             - role: control-plane\n\
             - role: edge\n\
             - {}\n",
        );
        assert_eq!(topology.total, 3);
        assert_eq!(topology.control_plane, 1);
        assert_eq!(topology.workers, 0);
    }

    #[test]
    fn missing_nodes_list_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kind: Cluster").unwrap();

        let err = expected_topology(file.path()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = expected_topology(Path::new("/nonexistent/cluster.yaml")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "kind: Cluster\nnodes:\n- role: control-plane\n- role: worker\n"
        )
        .unwrap();

        let topology = expected_topology(file.path()).unwrap();
        assert_eq!(topology.total, 2);
        assert_eq!(topology.control_plane, 1);
        assert_eq!(topology.workers, 1);
    }
}
