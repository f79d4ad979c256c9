//! multicloud-deployer - concurrent application rollout across cloud clusters
//!
//! This library binds provider credentials, drives a per-provider deployment
//! pipeline through kubectl, runs providers concurrently with failure
//! isolation and renders a consolidated report.

pub mod config;
pub mod connectors;
pub mod deployment;
pub mod error;
pub mod services;

// Re-export commonly used types
pub use config::RootConfig;
pub use connectors::{CommandRunner, ProcessExecutor, ProcessResult};
pub use deployment::{DeployState, DeploymentStatus, Orchestrator};
pub use error::{AppError, Result};
pub use services::{NotificationDispatcher, ReportGenerator};
