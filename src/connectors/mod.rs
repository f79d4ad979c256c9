//! Connector system for external tooling
//!
//! Everything the deployer does to a cluster goes through the
//! `CommandRunner` seam:
//! - `process`: the tokio-backed runner
//! - `cloud`: per-provider credential commands
//! - `kubernetes`: kubectl command construction and output parsing

pub mod cloud;
pub mod kubernetes;
pub mod process;
pub mod traits;

// Re-export core types and traits for easy access
pub use cloud::{CredentialBinder, CredentialSource, ProviderKind};
pub use kubernetes::{Kubectl, PodCounts};
pub use process::ProcessExecutor;
pub use traits::{CommandRunner, ProcessResult};

/// Shared handle to a command runner
pub type RunnerInstance = std::sync::Arc<dyn CommandRunner>;
