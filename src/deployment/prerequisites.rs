//! Startup check for required command-line tools

use crate::connectors::{CommandRunner, ProviderKind};
use crate::error::{AppError, Result};
use tracing::{error, info};

/// Orchestrator CLI, container CLI and package manager
pub const REQUIRED_TOOLS: [&str; 3] = ["kubectl", "docker", "helm"];

/// Base tools plus the credential CLI of every supported target.
/// Unsupported ids are skipped; they fail later as a provider status.
pub fn required_tools(providers: &[String]) -> Vec<String> {
    let mut tools: Vec<String> = REQUIRED_TOOLS.iter().map(|t| t.to_string()).collect();

    for kind in providers.iter().filter_map(|id| id.parse::<ProviderKind>().ok()) {
        let cli = kind.cli().to_string();
        if !tools.contains(&cli) {
            tools.push(cli);
        }
    }
    tools
}

/// Fail with `PrerequisiteMissing` unless every tool resolves on `PATH`
pub async fn check_prerequisites<T: AsRef<str>>(runner: &dyn CommandRunner, tools: &[T]) -> Result<()> {
    let mut missing = Vec::new();

    for tool in tools.iter().map(AsRef::as_ref) {
        let result = runner
            .run(&["which".to_string(), tool.to_string()], None, None)
            .await;

        if result.is_success() {
            info!("✓ {} is available", tool);
        } else {
            error!("✗ {} is not installed", tool);
            missing.push(tool.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::PrerequisiteMissing(missing))
    }
}
