//! Key material handed to the Vault signing method.
//!
//! A `RemoteSigningConfig` is passed as the `key` argument of
//! `SigningMethod::sign` and `SigningMethod::verify`. It names the transit key
//! and carries the credentials needed to use it; the key itself stays in Vault.

use serde::Deserialize;

use super::{SecretString, SignerError};
use crate::{config::EndpointOverrides, constants::DEFAULT_TRANSIT_MOUNT_PATH};

fn default_mount_path() -> String {
    DEFAULT_TRANSIT_MOUNT_PATH.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSigningConfig {
    /// Overrides applied on top of the process-wide endpoint configuration
    #[serde(default)]
    pub endpoint: EndpointOverrides,
    /// Name of the transit key; may contain `/` separated segments
    pub key_path: String,
    /// Vault token presented with every request
    pub auth_token: SecretString,
    /// Require HTTPS with certificate validation
    #[serde(default)]
    pub tls_enabled: bool,
    /// Mount point of the transit engine
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
}

impl RemoteSigningConfig {
    pub fn new(key_path: impl Into<String>, auth_token: SecretString) -> Self {
        Self {
            endpoint: EndpointOverrides::default(),
            key_path: key_path.into(),
            auth_token,
            tls_enabled: false,
            mount_path: default_mount_path(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointOverrides) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_tls(mut self, tls_enabled: bool) -> Self {
        self.tls_enabled = tls_enabled;
        self
    }

    pub fn with_mount_path(mut self, mount_path: impl Into<String>) -> Self {
        self.mount_path = mount_path.into();
        self
    }

    /// Checks the invariants that must hold before any request is attempted.
    ///
    /// The token is checked first so that a missing credential is always
    /// reported as `MissingCredential`, whatever else is wrong.
    pub fn validate(&self) -> Result<(), SignerError> {
        if self.auth_token.is_empty() {
            return Err(SignerError::MissingCredential);
        }
        if self.key_path.trim_matches('/').is_empty() {
            return Err(SignerError::Configuration(
                "Key path cannot be empty".to_string(),
            ));
        }
        if self.mount_path.trim_matches('/').is_empty() {
            return Err(SignerError::Configuration(
                "Mount path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
