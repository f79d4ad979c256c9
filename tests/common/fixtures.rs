use multicloud_deployer::config::{ProviderConfig, RootConfig};
use multicloud_deployer::deployment::DeploymentStatus;

/// Default configuration restricted to `providers`, each with context
/// `<id>-ctx` so mock rules can target one provider's kubectl calls.
pub fn config_with(providers: &[&str]) -> RootConfig {
    let mut config = RootConfig::default();
    config.monitoring.slack_webhook = None;
    config.providers.retain(|id, _| providers.contains(&id.as_str()));

    for id in providers {
        let provider = config
            .providers
            .entry(id.to_string())
            .or_insert_with(|| ProviderConfig {
                name: id.to_string(),
                cluster_name: format!("{}-cluster", id),
                region: "local".to_string(),
                context: String::new(),
                endpoint: None,
                resource_group: None,
                project_id: None,
            });
        provider.context = context_for(id);
    }

    config
}

pub fn context_for(provider: &str) -> String {
    format!("{}-ctx", provider)
}

pub fn status_for<'a>(statuses: &'a [DeploymentStatus], provider: &str) -> &'a DeploymentStatus {
    statuses
        .iter()
        .find(|status| status.provider == provider)
        .unwrap_or_else(|| panic!("no status for {}", provider))
}
