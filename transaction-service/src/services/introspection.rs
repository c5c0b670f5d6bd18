//! OAuth2 token introspection (RFC 7662).
//!
//! Opaque bearer tokens are exchanged for their activity flag and granted
//! scope by POSTing them to the authorization server with client
//! credentials.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Duration;
use thiserror::Error;

use crate::config::IntrospectionConfig;

/// The subset of an introspection response the service relies on.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct IntrospectedToken {
    pub active: bool,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl IntrospectedToken {
    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("introspection request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("introspection endpoint returned {0}")]
    Status(StatusCode),

    #[error("invalid introspection response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    async fn introspect(
        &self,
        token: &str,
        request_id: Option<&str>,
    ) -> Result<IntrospectedToken, IntrospectionError>;
}

pub struct HttpIntrospector {
    client: Client,
    settings: IntrospectionConfig,
}

impl HttpIntrospector {
    pub fn new(settings: IntrospectionConfig) -> Result<Self, IntrospectionError> {
        if !settings.verify_tls {
            tracing::warn!(
                endpoint = %settings.endpoint,
                "TLS certificate verification disabled for token introspection"
            );
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!settings.verify_tls)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(IntrospectionError::Transport)?;

        Ok(Self { client, settings })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }
}

#[async_trait]
impl TokenIntrospector for HttpIntrospector {
    async fn introspect(
        &self,
        token: &str,
        request_id: Option<&str>,
    ) -> Result<IntrospectedToken, IntrospectionError> {
        let response = self
            .client
            .traced_post(&self.settings.endpoint)
            .header("accept", "application/json")
            .basic_auth(
                &self.settings.client_id,
                Some(self.settings.client_secret.expose_secret().as_str()),
            )
            .form(&[("token", token)])
            .send_with_request_id(request_id)
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %self.settings.endpoint, error = %e, "Introspection request failed");
                IntrospectionError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %self.settings.endpoint, %status, "Introspection endpoint rejected request");
            return Err(IntrospectionError::Status(status));
        }

        response
            .json::<IntrospectedToken>()
            .await
            .map_err(IntrospectionError::Decode)
    }
}
