//! Per-provider deployment pipeline
//!
//! ```text
//! Init -> CredentialsBound -> NamespaceEnsured -> ManifestsApplied -> RolloutComplete -> Done
//!   \__________________\___________________\___________________\______> Failed
//! ```
//!
//! `Failed` is terminal for the provider it belongs to. The pipeline never
//! builds a `DeploymentStatus`; the orchestrator does that after status
//! collection.

use crate::config::{DeploymentConfig, ProviderConfig};
use crate::connectors::kubernetes::{is_already_exists, Kubectl};
use crate::connectors::{CommandRunner, CredentialBinder};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Workloads whose rollout is awaited, in order
pub const WORKLOADS: [&str; 2] = ["frontend", "backend"];

/// Workload manifests, relative to the manifest root
pub const DEPLOYMENTS_MANIFEST_DIR: &str = "infrastructure/kubernetes/deployments/";

/// Networking manifests, relative to the manifest root
pub const SERVICES_MANIFEST_DIR: &str = "infrastructure/kubernetes/services/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    CredentialsBound,
    NamespaceEnsured,
    ManifestsApplied,
    RolloutComplete,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Init => "init",
            PipelineStage::CredentialsBound => "credentials-bound",
            PipelineStage::NamespaceEnsured => "namespace-ensured",
            PipelineStage::ManifestsApplied => "manifests-applied",
            PipelineStage::RolloutComplete => "rollout-complete",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Done,
    /// `stage` is the last stage reached before the failure
    Failed { stage: PipelineStage, message: String },
}

/// Drives one provider from credentials to completed rollout
#[derive(Clone)]
pub struct ProviderPipeline {
    runner: Arc<dyn CommandRunner>,
    binder: CredentialBinder,
}

impl ProviderPipeline {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binder: CredentialBinder::new(Arc::clone(&runner)),
            runner,
        }
    }

    pub async fn run(&self, provider: &ProviderConfig, deployment: &DeploymentConfig) -> PipelineOutcome {
        info!("Starting deployment to {}", provider.name);

        let kubectl = Kubectl::new(&provider.context, &deployment.namespace);
        let mut stage = PipelineStage::Init;

        while stage != PipelineStage::Done {
            let next = match stage {
                PipelineStage::Init => self.bind(provider).await,
                PipelineStage::CredentialsBound => self.ensure_namespace(&kubectl).await,
                PipelineStage::NamespaceEnsured => {
                    self.apply_manifests(&kubectl, Path::new(&deployment.manifest_root)).await
                }
                PipelineStage::ManifestsApplied => self.wait_for_rollouts(&kubectl).await,
                PipelineStage::RolloutComplete => Ok(()),
                PipelineStage::Done | PipelineStage::Failed => break,
            };

            match next {
                Ok(()) => {
                    stage = advance(stage);
                    debug!("➡️ {} reached stage {}", provider.name, stage);
                }
                Err(message) => {
                    error!("Deployment to {} failed at {}: {}", provider.name, stage, message);
                    return PipelineOutcome::Failed { stage, message };
                }
            }
        }

        info!("Successfully deployed to {}", provider.name);
        PipelineOutcome::Done
    }

    async fn bind(&self, provider: &ProviderConfig) -> Result<(), String> {
        match self.binder.bind(provider).await {
            Ok(result) if result.is_success() => Ok(()),
            Ok(result) => Err(format!(
                "Credential binding failed: {}",
                result.error_summary()
            )),
            Err(e) => Err(e.to_string()),
        }
    }

    async fn ensure_namespace(&self, kubectl: &Kubectl) -> Result<(), String> {
        let manifest = kubectl.namespace_manifest();
        let result = self
            .runner
            .run(&kubectl.apply_stdin(), None, Some(&manifest))
            .await;

        if result.is_success() || is_already_exists(&result.stderr) {
            debug!("✅ Namespace '{}' is in place", kubectl.namespace());
            return Ok(());
        }

        Err(format!(
            "Failed to create namespace '{}': {}",
            kubectl.namespace(),
            result.error_summary()
        ))
    }

    async fn apply_manifests(&self, kubectl: &Kubectl, manifest_root: &Path) -> Result<(), String> {
        for dir in [DEPLOYMENTS_MANIFEST_DIR, SERVICES_MANIFEST_DIR] {
            let result = self
                .runner
                .run(&kubectl.apply_path(dir), Some(manifest_root), None)
                .await;

            if !result.is_success() {
                return Err(format!(
                    "Failed to apply manifests from {}: {}",
                    dir,
                    result.error_summary()
                ));
            }
        }
        Ok(())
    }

    async fn wait_for_rollouts(&self, kubectl: &Kubectl) -> Result<(), String> {
        for workload in WORKLOADS {
            let result = self.runner.run(&kubectl.rollout_status(workload), None, None).await;

            if !result.is_success() {
                return Err(format!(
                    "Rollout of deployment/{} did not complete: {}",
                    workload,
                    result.error_summary()
                ));
            }
            info!("✅ Rollout complete for deployment/{}", workload);
        }
        Ok(())
    }
}

fn advance(stage: PipelineStage) -> PipelineStage {
    match stage {
        PipelineStage::Init => PipelineStage::CredentialsBound,
        PipelineStage::CredentialsBound => PipelineStage::NamespaceEnsured,
        PipelineStage::NamespaceEnsured => PipelineStage::ManifestsApplied,
        PipelineStage::ManifestsApplied => PipelineStage::RolloutComplete,
        PipelineStage::RolloutComplete | PipelineStage::Done => PipelineStage::Done,
        PipelineStage::Failed => PipelineStage::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_advance_in_order() {
        let mut stage = PipelineStage::Init;
        let mut seen = vec![stage];
        while stage != PipelineStage::Done {
            stage = advance(stage);
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::Init,
                PipelineStage::CredentialsBound,
                PipelineStage::NamespaceEnsured,
                PipelineStage::ManifestsApplied,
                PipelineStage::RolloutComplete,
                PipelineStage::Done,
            ]
        );
    }

    #[test]
    fn test_failed_is_terminal() {
        assert_eq!(advance(PipelineStage::Failed), PipelineStage::Failed);
        assert_eq!(PipelineStage::ManifestsApplied.to_string(), "manifests-applied");
    }
}
