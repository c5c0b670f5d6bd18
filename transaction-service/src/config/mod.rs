use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, ServerConfig};
use service_core::error::AppError;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector, e.g. `http://tempo:4317`. Unset disables export.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub introspection: IntrospectionConfig,
}

/// OAuth2 token introspection (RFC 7662) client settings.
#[derive(Deserialize, Clone, Debug)]
pub struct IntrospectionConfig {
    #[serde(default = "default_introspection_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_client_secret")]
    pub client_secret: Secret<String>,
    /// Off by default; local introspection servers use self-signed certs.
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IntrospectionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_introspection_endpoint(),
            client_id: default_client_id(),
            client_secret: default_client_secret(),
            verify_tls: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_service_name() -> String {
    "transaction-service".to_string()
}

fn default_log_level() -> String {
    "info,transaction_service=debug".to_string()
}

fn default_introspection_endpoint() -> String {
    "https://localhost:8443/introspection".to_string()
}

fn default_client_id() -> String {
    "test_gateway_client".to_string()
}

fn default_client_secret() -> Secret<String> {
    Secret::new("changeme".to_string())
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        core_config::load("transaction-service")
    }
}
