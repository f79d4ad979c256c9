//! Monitoring stack installation (Prometheus, Grafana)

use crate::config::{ProviderConfig, RootConfig};
use crate::connectors::kubernetes::Kubectl;
use crate::connectors::{CommandRunner, CredentialBinder};
use crate::error::{AppError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub const PROMETHEUS_MANIFEST_DIR: &str = "infrastructure/monitoring/prometheus/";
pub const GRAFANA_MANIFEST_DIR: &str = "infrastructure/monitoring/grafana/";

pub struct MonitoringInstaller {
    runner: Arc<dyn CommandRunner>,
    binder: CredentialBinder,
}

impl MonitoringInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binder: CredentialBinder::new(Arc::clone(&runner)),
            runner,
        }
    }

    /// Manifest directories enabled by the monitoring flags
    pub fn enabled_components(config: &RootConfig) -> Vec<&'static str> {
        let mut dirs = Vec::new();
        if config.monitoring.prometheus_enabled {
            dirs.push(PROMETHEUS_MANIFEST_DIR);
        }
        if config.monitoring.grafana_enabled {
            dirs.push(GRAFANA_MANIFEST_DIR);
        }
        dirs
    }

    pub async fn install(&self, config: &RootConfig, provider: &ProviderConfig) -> Result<()> {
        info!("Setting up monitoring on {}...", provider.name);

        let bound = self.binder.bind(provider).await?;
        if !bound.is_success() {
            return Err(AppError::CommandExecutionError(format!(
                "Credential binding failed for {}: {}",
                provider.name,
                bound.error_summary()
            )));
        }

        let kubectl = Kubectl::new(&provider.context, &config.deployment.namespace);
        let manifest_root = Path::new(&config.deployment.manifest_root);

        for dir in Self::enabled_components(config) {
            let result = self
                .runner
                .run(&kubectl.apply_path(dir), Some(manifest_root), None)
                .await;
            if !result.is_success() {
                return Err(AppError::CommandExecutionError(format!(
                    "Failed to apply {} on {}: {}",
                    dir,
                    provider.name,
                    result.error_summary()
                )));
            }
        }

        info!("Monitoring setup completed on {}", provider.name);
        Ok(())
    }
}
