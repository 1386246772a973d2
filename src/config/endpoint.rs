use serde::Deserialize;
use std::{env, time::Duration};
use validator::{Validate, ValidationError};

use super::EndpointConfigError;
use crate::{
    constants::{
        DEFAULT_HTTP_CLIENT_CONNECT_TIMEOUT_SECONDS, DEFAULT_HTTP_CLIENT_MAX_RETRIES,
        DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS, DEFAULT_VAULT_ADDRESS, VAULT_ADDR_ENV,
        VAULT_CACERT_ENV, VAULT_CLIENT_TIMEOUT_ENV, VAULT_MAX_RETRIES_ENV, VAULT_NAMESPACE_ENV,
    },
    utils::{deserialize_optional_duration, parse_duration},
};

/// Resolved connection parameters for a Vault server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Validate)]
pub struct EndpointConfig {
    /// Vault server address (e.g., "https://vault.example.com:8200")
    #[validate(url(message = "Vault address must be a valid URL"))]
    pub address: String,
    /// Overall timeout of a single request
    #[validate(custom(function = "validate_non_zero_duration"))]
    pub timeout: Duration,
    /// Timeout for establishing the connection
    #[validate(custom(function = "validate_non_zero_duration"))]
    pub connect_timeout: Duration,
    /// Extra attempts after a transport failure. Zero disables retries.
    pub max_retries: u32,
    /// Namespace (for Vault Enterprise)
    pub namespace: Option<String>,
    /// Optional path to a PEM CA certificate used to verify Vault's TLS certificate
    pub ca_cert: Option<String>,
}

fn validate_non_zero_duration(value: &Duration) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::new("zero_duration")
            .with_message("duration must be greater than zero".into()));
    }
    Ok(())
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_VAULT_ADDRESS.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS),
            connect_timeout: Duration::from_secs(DEFAULT_HTTP_CLIENT_CONNECT_TIMEOUT_SECONDS),
            max_retries: DEFAULT_HTTP_CLIENT_MAX_RETRIES,
            namespace: None,
            ca_cert: None,
        }
    }
}

impl EndpointConfig {
    /// Built-in defaults overlaid with the `VAULT_*` environment variables.
    pub fn from_env() -> Result<Self, EndpointConfigError> {
        Ok(Self::default().merge(&EndpointOverrides::from_env()?))
    }

    /// Overlays every field set in `overrides` on top of `self`.
    ///
    /// Fields left as `None` in `overrides` keep the value from `self`, so the
    /// result only depends on the two inputs.
    pub fn merge(&self, overrides: &EndpointOverrides) -> EndpointConfig {
        EndpointConfig {
            address: overrides
                .address
                .clone()
                .unwrap_or_else(|| self.address.clone()),
            timeout: overrides.timeout.unwrap_or(self.timeout),
            connect_timeout: overrides.connect_timeout.unwrap_or(self.connect_timeout),
            max_retries: overrides.max_retries.unwrap_or(self.max_retries),
            namespace: overrides
                .namespace
                .clone()
                .or_else(|| self.namespace.clone()),
            ca_cert: overrides.ca_cert.clone().or_else(|| self.ca_cert.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), EndpointConfigError> {
        match Validate::validate(self) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let error_message = errors
                    .field_errors()
                    .iter()
                    .map(|(field, errors)| {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|error| error.message.clone().unwrap_or_default().to_string())
                            .collect();
                        format!("{}: {}", field, messages.join(", "))
                    })
                    .collect::<Vec<String>>()
                    .join("; ");

                Err(EndpointConfigError::InvalidFormat(error_message))
            }
        }
    }
}

/// Caller-supplied endpoint settings. Every field is optional; unset fields
/// inherit from the base configuration when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointOverrides {
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_duration")]
    pub timeout: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_optional_duration")]
    pub connect_timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub namespace: Option<String>,
    pub ca_cert: Option<String>,
}

impl EndpointOverrides {
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_ca_cert(mut self, ca_cert: impl Into<String>) -> Self {
        self.ca_cert = Some(ca_cert.into());
        self
    }

    /// Reads the `VAULT_*` environment variables the Vault CLI understands.
    /// Unset or empty variables leave the field unset.
    pub fn from_env() -> Result<Self, EndpointConfigError> {
        let timeout = match non_empty_env(VAULT_CLIENT_TIMEOUT_ENV) {
            Some(value) => Some(parse_duration(&value).ok_or_else(|| {
                EndpointConfigError::InvalidEnv {
                    var: VAULT_CLIENT_TIMEOUT_ENV.to_string(),
                    value: value.clone(),
                }
            })?),
            None => None,
        };

        let max_retries = match non_empty_env(VAULT_MAX_RETRIES_ENV) {
            Some(value) => Some(value.trim().parse::<u32>().map_err(|_| {
                EndpointConfigError::InvalidEnv {
                    var: VAULT_MAX_RETRIES_ENV.to_string(),
                    value: value.clone(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            address: non_empty_env(VAULT_ADDR_ENV),
            timeout,
            connect_timeout: None,
            max_retries,
            namespace: non_empty_env(VAULT_NAMESPACE_ENV),
            ca_cert: non_empty_env(VAULT_CACERT_ENV),
        })
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}
