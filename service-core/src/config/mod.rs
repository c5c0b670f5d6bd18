//! Layered configuration loading shared by every service.
//!
//! Sources, lowest precedence first:
//! 1. `<service>/configuration/base.yaml` (optional)
//! 2. `APP_`-prefixed environment variables, `__` separating nested keys
//!    (e.g. `APP_SERVER__PORT=9000`)

use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Load a service configuration, looking for `configuration/base.yaml`
/// either in the working directory or in the `service_dir` sub-directory
/// when started from the workspace root.
pub fn load<T: DeserializeOwned>(service_dir: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::from(configuration_directory(service_dir)?.join("base.yaml")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

fn configuration_directory(service_dir: &str) -> Result<PathBuf, AppError> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with(service_dir) {
        Ok(base_path.join("configuration"))
    } else {
        Ok(base_path.join(service_dir).join("configuration"))
    }
}
