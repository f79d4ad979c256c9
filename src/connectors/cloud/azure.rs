use super::{required_field, to_args, CredentialSource};
use crate::config::ProviderConfig;
use crate::error::Result;

/// AKS credentials through the Azure CLI
#[derive(Debug, Default)]
pub struct AzureCredentials;

impl CredentialSource for AzureCredentials {
    fn credential_command(&self, provider: &ProviderConfig) -> Result<Vec<String>> {
        let resource_group = required_field(provider, "resource_group", &provider.resource_group)?;

        Ok(to_args(&[
            "az",
            "aks",
            "get-credentials",
            "--resource-group",
            resource_group,
            "--name",
            &provider.cluster_name,
        ]))
    }
}
