//! Deployment status records and the pod-based status collector

use crate::connectors::kubernetes::{parse_pod_counts, Kubectl, PodCounts};
use crate::connectors::CommandRunner;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployState {
    Healthy,
    Degraded,
    Failed,
    Unknown,
}

impl DeployState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployState::Healthy => "healthy",
            DeployState::Degraded => "degraded",
            DeployState::Failed => "failed",
            DeployState::Unknown => "unknown",
        }
    }

    /// Whether this state counts towards the report's success rate
    pub fn is_success(&self) -> bool {
        matches!(self, DeployState::Healthy)
    }

    fn from_counts(counts: PodCounts) -> Self {
        if counts.total > 0 && counts.running == counts.total {
            DeployState::Healthy
        } else {
            DeployState::Degraded
        }
    }
}

impl std::fmt::Display for DeployState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one provider's run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentStatus {
    pub provider: String,
    pub state: DeployState,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub pods_running: u32,
    pub pods_total: u32,
}

impl DeploymentStatus {
    fn new(provider: &str, state: DeployState, message: String, counts: PodCounts) -> Self {
        Self {
            provider: provider.to_string(),
            state,
            message,
            timestamp: Utc::now(),
            pods_running: counts.running.min(counts.total),
            pods_total: counts.total,
        }
    }

    pub fn from_pod_counts(provider: &str, counts: PodCounts) -> Self {
        Self::new(
            provider,
            DeployState::from_counts(counts),
            format!("{}/{} pods running", counts.running, counts.total),
            counts,
        )
    }

    pub fn failed(provider: &str, message: impl Into<String>) -> Self {
        Self::new(provider, DeployState::Failed, message.into(), PodCounts { running: 0, total: 0 })
    }

    /// A failed deployment that still reports the pods observed afterwards
    pub fn failed_with_counts(provider: &str, message: impl Into<String>, counts: PodCounts) -> Self {
        Self::new(provider, DeployState::Failed, message.into(), counts)
    }

    pub fn unknown(provider: &str, error: impl std::fmt::Display) -> Self {
        Self::new(
            provider,
            DeployState::Unknown,
            format!("Failed to get status: {}", error),
            PodCounts { running: 0, total: 0 },
        )
    }

    pub fn counts(&self) -> PodCounts {
        PodCounts {
            running: self.pods_running,
            total: self.pods_total,
        }
    }
}

/// Queries a bound cluster for workload health
#[derive(Clone)]
pub struct StatusCollector {
    runner: Arc<dyn CommandRunner>,
}

impl StatusCollector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Count running pods in the namespace. Query failures yield `unknown`.
    pub async fn collect(&self, provider: &str, kubectl: &Kubectl) -> DeploymentStatus {
        debug!("📊 Collecting pod status for {} in {}", provider, kubectl.namespace());

        let result = self.runner.run(&kubectl.get_pods(), None, None).await;
        if !result.is_success() {
            warn!("⚠️ Status query failed for {}: {}", provider, result.error_summary());
            return DeploymentStatus::unknown(provider, result.error_summary());
        }

        match parse_pod_counts(&result.stdout) {
            Ok(counts) => DeploymentStatus::from_pod_counts(provider, counts),
            Err(e) => {
                warn!("⚠️ Could not parse pod list for {}: {}", provider, e);
                DeploymentStatus::unknown(provider, e)
            }
        }
    }
}
