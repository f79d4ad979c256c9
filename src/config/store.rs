//! Loading and persisting the deployment configuration file

use super::schema::RootConfig;
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "deployment-config.yaml";

/// Reads and writes `RootConfig` documents
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the configuration, writing the built-in defaults first if the
    /// file does not exist yet.
    pub fn load(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            warn!(
                "Config file {} not found, using defaults",
                self.path.display()
            );
            let config = RootConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        info!("Loading deployment configuration from: {}", self.path.display());

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.unreadable(e))?;
        let mut config: RootConfig =
            serde_yaml::from_str(&content).map_err(|e| self.unreadable(e))?;
        config.assign_provider_names();
        config.validate().map_err(|e| self.unreadable(e))?;

        debug!(
            "Configuration loaded with {} providers",
            config.providers.len()
        );
        Ok(config)
    }

    pub fn save(&self, config: &RootConfig) -> Result<()> {
        info!("Saving deployment configuration to: {}", self.path.display());

        let content = to_yaml(config)?;
        std::fs::write(&self.path, content).map_err(|e| {
            AppError::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Configuration saved successfully");
        Ok(())
    }

    fn unreadable<E: std::fmt::Display>(&self, err: E) -> AppError {
        AppError::ConfigUnreadable {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

/// Render a configuration the same way `save` writes it
pub fn to_yaml(config: &RootConfig) -> Result<String> {
    serde_yaml::to_string(config).map_err(|e| {
        AppError::ConfigurationError(format!("Failed to serialize to YAML: {}", e))
    })
}

/// Convenience wrapper around `ConfigStore::load`
pub fn load<P: AsRef<Path>>(path: P) -> Result<RootConfig> {
    ConfigStore::new(path).load()
}

/// Convenience wrapper around `ConfigStore::save`
pub fn save<P: AsRef<Path>>(path: P, config: &RootConfig) -> Result<()> {
    ConfigStore::new(path).save(config)
}
