//! Deployment engine: pipeline, status collection and orchestration

pub mod health_checks;
pub mod monitoring;
pub mod orchestrator;
pub mod pipeline;
pub mod prerequisites;
pub mod status;

pub use health_checks::{HealthProber, HealthReport, HealthStatus};
pub use monitoring::MonitoringInstaller;
pub use orchestrator::{Orchestrator, DEFAULT_CONCURRENCY};
pub use pipeline::{PipelineOutcome, PipelineStage, ProviderPipeline, WORKLOADS};
pub use prerequisites::{check_prerequisites, required_tools, REQUIRED_TOOLS};
pub use status::{DeployState, DeploymentStatus, StatusCollector};
