//! Configuration schema for multi-cloud deployments
//!
//! The document has three sections: `providers`, `deployment` and
//! `monitoring`. Maps are `BTreeMap`s so serialization order is stable.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Current configuration schema version
pub const CONFIG_VERSION: u32 = 1;

/// Default Kubernetes namespace for the application
pub const DEFAULT_NAMESPACE: &str = "addtocloud-prod";

/// Environment variable consulted for the default webhook
pub const WEBHOOK_ENV_VAR: &str = "SLACK_WEBHOOK_URL";

/// Root configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    pub providers: BTreeMap<String, ProviderConfig>,
    pub deployment: DeploymentConfig,
    pub monitoring: MonitoringConfig,
}

/// Cluster coordinates for a single cloud provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier, taken from the key in the `providers` map
    #[serde(skip)]
    pub name: String,
    pub cluster_name: String,
    pub region: String,
    /// kubectl context produced by the provider's credential command
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub namespace: String,
    #[serde(default)]
    pub replicas: BTreeMap<String, u32>,
    #[serde(default)]
    pub resources: BTreeMap<String, WorkloadResources>,
    /// Directory manifest paths are resolved against
    #[serde(default = "default_manifest_root")]
    pub manifest_root: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadResources {
    pub requests: ResourceQuantities,
    pub limits: ResourceQuantities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuantities {
    pub cpu: String,
    pub memory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub prometheus_enabled: bool,
    #[serde(default)]
    pub grafana_enabled: bool,
    #[serde(default)]
    pub alerts_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_webhook: Option<String>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_manifest_root() -> String {
    ".".to_string()
}

impl ResourceQuantities {
    fn new(cpu: &str, memory: &str) -> Self {
        Self {
            cpu: cpu.to_string(),
            memory: memory.to_string(),
        }
    }
}

impl ProviderConfig {
    fn new(name: &str, cluster_name: &str, region: &str, context: &str) -> Self {
        Self {
            name: name.to_string(),
            cluster_name: cluster_name.to_string(),
            region: region.to_string(),
            context: context.to_string(),
            endpoint: None,
            resource_group: None,
            project_id: None,
        }
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        let mut replicas = BTreeMap::new();
        replicas.insert("frontend".to_string(), 3);
        replicas.insert("backend".to_string(), 3);

        let mut resources = BTreeMap::new();
        resources.insert(
            "frontend".to_string(),
            WorkloadResources {
                requests: ResourceQuantities::new("250m", "256Mi"),
                limits: ResourceQuantities::new("500m", "512Mi"),
            },
        );
        resources.insert(
            "backend".to_string(),
            WorkloadResources {
                requests: ResourceQuantities::new("500m", "512Mi"),
                limits: ResourceQuantities::new("1000m", "1Gi"),
            },
        );

        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            replicas,
            resources,
            manifest_root: default_manifest_root(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        let slack_webhook = std::env::var(WEBHOOK_ENV_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            prometheus_enabled: true,
            grafana_enabled: true,
            alerts_enabled: true,
            slack_webhook,
        }
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        let mut providers = BTreeMap::new();

        providers.insert(
            "aws".to_string(),
            ProviderConfig::new(
                "aws",
                "addtocloud-eks",
                "us-east-1",
                "arn:aws:eks:us-east-1:ACCOUNT:cluster/addtocloud-eks",
            ),
        );

        let mut azure = ProviderConfig::new("azure", "addtocloud-aks", "eastus", "addtocloud-aks");
        azure.resource_group = Some("addtocloud-rg".to_string());
        providers.insert("azure".to_string(), azure);

        let mut gcp = ProviderConfig::new(
            "gcp",
            "addtocloud-gke",
            "us-central1-a",
            "gke_PROJECT_us-central1-a_addtocloud-gke",
        );
        gcp.project_id = Some("your-project-id".to_string());
        providers.insert("gcp".to_string(), gcp);

        Self {
            version: CONFIG_VERSION,
            providers,
            deployment: DeploymentConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl RootConfig {
    /// Look up a provider by identifier
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }

    /// Configured provider identifiers in stable order
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    /// Copy each map key into the provider's `name` field
    pub(crate) fn assign_provider_names(&mut self) {
        for (id, provider) in self.providers.iter_mut() {
            provider.name = id.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(AppError::ConfigurationError(format!(
                "Unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }

        if self.deployment.namespace.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "Deployment namespace cannot be empty".to_string(),
            ));
        }

        for (id, provider) in &self.providers {
            for (field, value) in [
                ("cluster_name", &provider.cluster_name),
                ("region", &provider.region),
                ("context", &provider.context),
            ] {
                if value.trim().is_empty() {
                    return Err(AppError::ConfigurationError(format!(
                        "Provider '{}' has an empty {}",
                        id, field
                    )));
                }
            }
        }

        for (workload, resources) in &self.deployment.resources {
            validate_quantities(workload, "requests", &resources.requests)?;
            validate_quantities(workload, "limits", &resources.limits)?;
        }

        if let Some(webhook) = &self.monitoring.slack_webhook {
            if !webhook.trim().is_empty() {
                url::Url::parse(webhook).map_err(|e| {
                    AppError::ConfigurationError(format!("Invalid webhook URL '{}': {}", webhook, e))
                })?;
            }
        }

        debug!("✅ Configuration validation passed");
        Ok(())
    }
}

fn validate_quantities(workload: &str, kind: &str, quantities: &ResourceQuantities) -> Result<()> {
    if !is_valid_cpu_format(&quantities.cpu) {
        return Err(AppError::ConfigurationError(format!(
            "Invalid CPU {} for {}: {}",
            kind, workload, quantities.cpu
        )));
    }
    if !is_valid_memory_format(&quantities.memory) {
        return Err(AppError::ConfigurationError(format!(
            "Invalid memory {} for {}: {}",
            kind, workload, quantities.memory
        )));
    }
    Ok(())
}

fn is_valid_cpu_format(cpu: &str) -> bool {
    if let Some(millis) = cpu.strip_suffix('m') {
        millis.parse::<u32>().is_ok()
    } else {
        cpu.parse::<f64>().map(|v| v >= 0.0).unwrap_or(false)
    }
}

fn is_valid_memory_format(memory: &str) -> bool {
    let suffixes = [
        "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "K", "M", "G", "T", "P", "E",
    ];

    for suffix in &suffixes {
        if let Some(amount) = memory.strip_suffix(suffix) {
            return amount.parse::<u64>().is_ok();
        }
    }

    memory.parse::<u64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_three_providers() {
        let config = RootConfig::default();
        assert_eq!(config.provider_ids(), vec!["aws", "azure", "gcp"]);
        assert_eq!(config.provider("aws").unwrap().name, "aws");
        assert_eq!(
            config.provider("azure").unwrap().resource_group.as_deref(),
            Some("addtocloud-rg")
        );
        assert_eq!(config.deployment.namespace, DEFAULT_NAMESPACE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cpu_and_memory_formats() {
        assert!(is_valid_cpu_format("250m"));
        assert!(is_valid_cpu_format("0.5"));
        assert!(!is_valid_cpu_format("fast"));
        assert!(is_valid_memory_format("512Mi"));
        assert!(is_valid_memory_format("1Gi"));
        assert!(is_valid_memory_format("1024"));
        assert!(!is_valid_memory_format("lots"));
    }

    #[test]
    fn test_validation_rejects_bad_quantities() {
        let mut config = RootConfig::default();
        config
            .deployment
            .resources
            .get_mut("backend")
            .unwrap()
            .limits
            .memory = "one-gig".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid memory limits for backend"));
    }

    #[test]
    fn test_validation_rejects_future_version() {
        let config = RootConfig {
            version: CONFIG_VERSION + 1,
            ..RootConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_relative_webhook() {
        let mut config = RootConfig::default();
        config.monitoring.slack_webhook = Some("hooks/abc".to_string());
        assert!(config.validate().is_err());
    }
}
