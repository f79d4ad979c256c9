//! Cloud credential connectors
//!
//! Each supported provider has one credential-fetch command that merges the
//! cluster's credentials into the local kubeconfig:
//! - AWS (`aws eks update-kubeconfig`)
//! - Azure (`az aks get-credentials`)
//! - GCP (`gcloud container clusters get-credentials`)

pub mod aws;
pub mod azure;
pub mod gcp;

pub use aws::AwsCredentials;
pub use azure::AzureCredentials;
pub use gcp::GcpCredentials;

use super::traits::{CommandRunner, ProcessResult};
use crate::config::ProviderConfig;
use crate::error::{AppError, Result};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The fixed set of providers that have a credential command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Aws,
    Azure,
    Gcp,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Aws => "aws",
            ProviderKind::Azure => "azure",
            ProviderKind::Gcp => "gcp",
        }
    }

    /// CLI binary the credential command runs
    pub fn cli(&self) -> &'static str {
        match self {
            ProviderKind::Aws => "aws",
            ProviderKind::Azure => "az",
            ProviderKind::Gcp => "gcloud",
        }
    }

    fn credentials(&self) -> &'static dyn CredentialSource {
        match self {
            ProviderKind::Aws => &AwsCredentials,
            ProviderKind::Azure => &AzureCredentials,
            ProviderKind::Gcp => &GcpCredentials,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aws" => Ok(ProviderKind::Aws),
            "azure" => Ok(ProviderKind::Azure),
            "gcp" => Ok(ProviderKind::Gcp),
            other => Err(AppError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Builds the credential-fetch command for one provider
pub trait CredentialSource: Send + Sync {
    fn credential_command(&self, provider: &ProviderConfig) -> Result<Vec<String>>;
}

pub(crate) fn required_field<'a>(
    provider: &'a ProviderConfig,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::MissingProviderField {
            provider: provider.name.clone(),
            field,
        })
}

pub(crate) fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Makes a provider's cluster available to later kubectl calls
#[derive(Clone)]
pub struct CredentialBinder {
    runner: Arc<dyn CommandRunner>,
}

impl CredentialBinder {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run the provider's credential command.
    ///
    /// Unknown identifiers and incomplete provider entries are typed errors;
    /// a command that runs but fails comes back as an unsuccessful
    /// `ProcessResult`.
    pub async fn bind(&self, provider: &ProviderConfig) -> Result<ProcessResult> {
        let kind: ProviderKind = provider.name.parse()?;
        let command = kind.credentials().credential_command(provider)?;

        debug!("🔐 Binding credentials for {} ({})", kind, provider.cluster_name);
        let result = self.runner.run(&command, None, None).await;

        if result.is_success() {
            info!("Kubeconfig updated for {}", kind);
        } else {
            warn!("⚠️ Credential binding failed for {}: {}", kind, result.error_summary());
        }

        Ok(result)
    }
}
