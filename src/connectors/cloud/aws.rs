use super::{to_args, CredentialSource};
use crate::config::ProviderConfig;
use crate::error::Result;

/// EKS credentials through the AWS CLI
#[derive(Debug, Default)]
pub struct AwsCredentials;

impl CredentialSource for AwsCredentials {
    fn credential_command(&self, provider: &ProviderConfig) -> Result<Vec<String>> {
        Ok(to_args(&[
            "aws",
            "eks",
            "update-kubeconfig",
            "--region",
            &provider.region,
            "--name",
            &provider.cluster_name,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootConfig;

    #[test]
    fn test_aws_command() {
        let config = RootConfig::default();
        let command = AwsCredentials
            .credential_command(config.provider("aws").unwrap())
            .unwrap();
        assert_eq!(
            command,
            vec![
                "aws",
                "eks",
                "update-kubeconfig",
                "--region",
                "us-east-1",
                "--name",
                "addtocloud-eks"
            ]
        );
    }
}
