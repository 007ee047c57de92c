//! Shared test fixtures shaped like real kubectl JSON output.

use crate::process::CommandOutput;

pub(crate) fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub(crate) fn failed(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

pub(crate) fn node_json(name: &str, ready: bool) -> String {
    format!(
        r#"{{
            "apiVersion": "v1",
            "kind": "Node",
            "metadata": {{"name": "{name}"}},
            "status": {{"conditions": [
                {{"type": "MemoryPressure", "status": "False"}},
                {{"type": "Ready", "status": "{}"}}
            ]}}
        }}"#,
        if ready { "True" } else { "False" }
    )
}

pub(crate) fn node_list(nodes: &[(&str, bool)]) -> String {
    let items: Vec<String> = nodes
        .iter()
        .map(|(name, ready)| node_json(name, *ready))
        .collect();
    format!(
        r#"{{"apiVersion": "v1", "kind": "List", "metadata": {{"resourceVersion": ""}}, "items": [{}]}}"#,
        items.join(", ")
    )
}

fn container_status(name: &str, state: &str) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "ready": false,
            "restartCount": 0,
            "image": "docker.io/library/{name}:latest",
            "imageID": "",
            "state": {state}
        }}"#
    )
}

pub(crate) fn pod_json(name: &str, ready: bool) -> String {
    format!(
        r#"{{
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {{"name": "{name}"}},
            "status": {{
                "conditions": [{{"type": "Ready", "status": "{}"}}],
                "containerStatuses": [{}]
            }}
        }}"#,
        if ready { "True" } else { "False" },
        container_status("app", r#"{"running": {}}"#)
    )
}

pub(crate) fn pod_waiting_json(pod: &str, container: &str, reason: &str) -> String {
    format!(
        r#"{{
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {{"name": "{pod}"}},
            "status": {{
                "conditions": [{{"type": "Ready", "status": "False"}}],
                "containerStatuses": [{}]
            }}
        }}"#,
        container_status(
            container,
            &format!(r#"{{"waiting": {{"reason": "{reason}", "message": "pull failed"}}}}"#)
        )
    )
}

pub(crate) fn pod_list(items: &[String]) -> String {
    format!(
        r#"{{"apiVersion": "v1", "kind": "List", "metadata": {{"resourceVersion": ""}}, "items": [{}]}}"#,
        items.join(", ")
    )
}

pub(crate) fn deployment_json(name: &str, desired: i32, ready: i32, available: i32) -> String {
    let mut status_fields = vec![format!(r#""replicas": {desired}"#)];
    if ready > 0 {
        status_fields.push(format!(r#""readyReplicas": {ready}"#));
    }
    if available > 0 {
        status_fields.push(format!(r#""availableReplicas": {available}"#));
    }
    format!(
        r#"{{
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {{"name": "{name}", "namespace": "kube-system"}},
            "spec": {{"replicas": {desired}, "selector": {{}}, "template": {{}}}},
            "status": {{{}}}
        }}"#,
        status_fields.join(", ")
    )
}
