use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required secret: {0}")]
    MissingSecret(String),

    #[error("Missing deployed contract address for {0}")]
    MissingContract(String),

    #[error("Unknown network '{0}': expected test, localnet or testnet")]
    UnknownNetwork(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
