use super::{required_field, to_args, CredentialSource};
use crate::config::ProviderConfig;
use crate::error::Result;

/// GKE credentials through the gcloud CLI.
///
/// `region` holds the cluster's zone for zonal clusters.
#[derive(Debug, Default)]
pub struct GcpCredentials;

impl CredentialSource for GcpCredentials {
    fn credential_command(&self, provider: &ProviderConfig) -> Result<Vec<String>> {
        let project_id = required_field(provider, "project_id", &provider.project_id)?;

        Ok(to_args(&[
            "gcloud",
            "container",
            "clusters",
            "get-credentials",
            &provider.cluster_name,
            "--zone",
            &provider.region,
            "--project",
            project_id,
        ]))
    }
}
