//! kubectl command construction and output parsing
//!
//! Every command carries an explicit `--context` so that concurrent provider
//! tasks never depend on the kubeconfig's current context.

use crate::error::{AppError, Result};
use serde::Deserialize;

/// Rollout wait limit passed to `kubectl rollout status`
pub const ROLLOUT_TIMEOUT_SECS: u64 = 300;

/// kubectl invocations scoped to one cluster context and namespace
#[derive(Debug, Clone)]
pub struct Kubectl {
    context: String,
    namespace: String,
}

impl Kubectl {
    pub fn new(context: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn base(&self, args: &[&str]) -> Vec<String> {
        let mut command = vec![
            "kubectl".to_string(),
            "--context".to_string(),
            self.context.clone(),
        ];
        command.extend(args.iter().map(|s| s.to_string()));
        command
    }

    /// `kubectl apply -f -`, manifest supplied on stdin
    pub fn apply_stdin(&self) -> Vec<String> {
        self.base(&["apply", "-f", "-"])
    }

    /// `kubectl apply -f <path> -n <namespace>`
    pub fn apply_path(&self, path: &str) -> Vec<String> {
        self.base(&["apply", "-f", path, "-n", &self.namespace])
    }

    pub fn rollout_status(&self, workload: &str) -> Vec<String> {
        let target = format!("deployment/{}", workload);
        let timeout = format!("--timeout={}s", ROLLOUT_TIMEOUT_SECS);
        self.base(&["rollout", "status", &target, "-n", &self.namespace, &timeout])
    }

    pub fn get_pods(&self) -> Vec<String> {
        self.base(&["get", "pods", "-n", &self.namespace, "-o", "json"])
    }

    /// Namespace manifest with sidecar injection enabled
    pub fn namespace_manifest(&self) -> String {
        format!(
            r#"apiVersion: v1
kind: Namespace
metadata:
  name: {}
  labels:
    istio-injection: enabled
"#,
            self.namespace
        )
    }
}

/// True when kubectl refused a create because the object exists
pub fn is_already_exists(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    lowered.contains("already exists") || lowered.contains("alreadyexists")
}

#[derive(Debug, Deserialize)]
struct PodList {
    items: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    #[serde(default)]
    status: PodStatus,
}

#[derive(Debug, Default, Deserialize)]
struct PodStatus {
    #[serde(default)]
    phase: Option<String>,
}

/// Pod counts extracted from `kubectl get pods -o json`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PodCounts {
    pub running: u32,
    pub total: u32,
}

pub fn parse_pod_counts(json: &str) -> Result<PodCounts> {
    let list: PodList = serde_json::from_str(json)
        .map_err(|e| AppError::StatusQueryError(format!("invalid pod list: {}", e)))?;

    let total = list.items.len() as u32;
    let running = list
        .items
        .iter()
        .filter(|pod| pod.status.phase.as_deref() == Some("Running"))
        .count() as u32;

    Ok(PodCounts { running, total })
}
