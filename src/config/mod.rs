mod defaults;
mod deployments;
mod error;
mod loader;
mod raw;

pub(crate) use error::ConfigError;
pub(crate) use loader::{load_configuration, parse_cli};
pub(crate) use raw::{Config, ConfigRaw};
