use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] Box<figment::Error>),

    #[error(transparent)]
    Blockchain(#[from] oracle_blockchain::ConfigError),

    #[error("Missing required config file: {0}")]
    MissingConfig(String),

    #[error("Failed to read deployments file {path}: {reason}")]
    Deployments { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
