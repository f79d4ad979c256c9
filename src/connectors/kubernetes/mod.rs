//! Kubernetes connector built on the kubectl CLI

pub mod kubectl;

pub use kubectl::{is_already_exists, parse_pod_counts, Kubectl, PodCounts, ROLLOUT_TIMEOUT_SECS};
