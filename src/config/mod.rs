//! Deployment configuration
//!
//! `schema` defines the typed document, `store` reads and writes it.

pub mod schema;
pub mod store;

use dotenv::dotenv;
use tracing::{debug, info};

pub use schema::{
    DeploymentConfig, MonitoringConfig, ProviderConfig, ResourceQuantities, RootConfig,
    WorkloadResources, CONFIG_VERSION, DEFAULT_NAMESPACE, WEBHOOK_ENV_VAR,
};
pub use store::{load, save, to_yaml, ConfigStore, DEFAULT_CONFIG_FILE};

/// Load a `.env` file so environment-derived defaults see its values
pub fn load_env() {
    match dotenv() {
        Ok(_) => info!("✅ Loaded .env file"),
        Err(_) => debug!("No .env file found, using system environment variables"),
    }
}
