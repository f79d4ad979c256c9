use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Required tools not found on PATH: {}", .0.join(", "))]
    PrerequisiteMissing(Vec<String>),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Provider '{provider}' is missing required field '{field}'")]
    MissingProviderField { provider: String, field: &'static str },

    #[error("Config file {} could not be read: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Command execution error: {0}")]
    CommandExecutionError(String),

    #[error("Status query error: {0}")]
    StatusQueryError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

// Add From implementations for common error types
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StatusQueryError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::ConfigurationError(format!("YAML error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NotificationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
