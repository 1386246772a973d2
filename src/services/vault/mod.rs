//! HashiCorp Vault transit engine client.
//!
//! `VaultClientFactory` turns a `RemoteSigningConfig` into an authenticated
//! `VaultTransitClient`; the client issues the `hmac` and `verify` transit
//! operations.

mod client;
pub use client::*;

mod factory;
pub use factory::*;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::models::{RemoteSigningConfig, SignerError};

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VaultError {
    #[error("Vault client configuration error: {0}")]
    ConfigError(String),

    #[error("Vault request failed: {0}")]
    TransportError(String),

    #[error("Vault returned status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected Vault response: {0}")]
    ResponseError(String),
}

impl VaultError {
    /// Statuses that mean Vault could not serve the request right now
    /// (sealed, standby without forwarding, rate limited, overloaded).
    fn is_unavailable_status(status: u16) -> bool {
        status == 429 || status >= 500
    }
}

impl From<VaultError> for SignerError {
    fn from(error: VaultError) -> Self {
        match error {
            VaultError::ConfigError(msg) => SignerError::Configuration(msg),
            VaultError::TransportError(msg) => SignerError::RemoteUnavailable(msg),
            VaultError::ApiError { status, message } if VaultError::is_unavailable_status(status) => {
                SignerError::RemoteUnavailable(format!("status {}: {}", status, message))
            }
            VaultError::ApiError { status, message } => {
                SignerError::RemoteRejected { status, message }
            }
            VaultError::ResponseError(msg) => SignerError::RemoteResponseMalformed(msg),
        }
    }
}

/// Keyed-MAC operations offered by the transit engine.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransitClientTrait: Send + Sync {
    /// Returns the `hmac` string Vault computed over `input`.
    async fn generate_hmac(&self, key_path: &str, input: &[u8]) -> Result<String, VaultError>;

    /// Returns Vault's verdict on whether `hmac` matches `input`.
    async fn verify_hmac(&self, key_path: &str, input: &[u8], hmac: &str)
        -> Result<bool, VaultError>;
}

/// Builds transit clients from signing configurations.
#[cfg_attr(test, automock)]
pub trait TransitClientFactoryTrait: Send + Sync {
    fn build_client(
        &self,
        config: &RemoteSigningConfig,
    ) -> Result<Arc<dyn TransitClientTrait>, SignerError>;
}
