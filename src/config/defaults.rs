//! Process-wide base endpoint configuration.
//!
//! Set once with [`init_default_endpoint_config`] during startup; every client
//! built afterwards merges its caller overrides on top of it. Until it is set,
//! [`EndpointConfig::default`] is used.

use log::{debug, info};
use once_cell::sync::{Lazy, OnceCell};

use super::{EndpointConfig, EndpointConfigError};
use crate::utils::mask_url;

static DEFAULT_ENDPOINT_CONFIG: OnceCell<EndpointConfig> = OnceCell::new();

static BUILT_IN_ENDPOINT_CONFIG: Lazy<EndpointConfig> = Lazy::new(EndpointConfig::default);

/// Installs the process-wide base configuration.
///
/// Calling this again with an identical configuration is a no-op; a different
/// configuration is rejected with `EndpointConfigError::AlreadyInitialized`.
pub fn init_default_endpoint_config(config: EndpointConfig) -> Result<(), EndpointConfigError> {
    config.validate()?;

    match DEFAULT_ENDPOINT_CONFIG.set(config) {
        Ok(()) => {
            if let Some(config) = DEFAULT_ENDPOINT_CONFIG.get() {
                info!(
                    "Default Vault endpoint configured: {}",
                    mask_url(&config.address)
                );
            }
            Ok(())
        }
        Err(rejected) if DEFAULT_ENDPOINT_CONFIG.get() == Some(&rejected) => Ok(()),
        Err(_) => Err(EndpointConfigError::AlreadyInitialized),
    }
}

/// Returns the base configuration clients are merged onto.
pub fn default_endpoint_config() -> &'static EndpointConfig {
    match DEFAULT_ENDPOINT_CONFIG.get() {
        Some(config) => config,
        None => {
            debug!("Default Vault endpoint not initialized, using built-in defaults");
            &BUILT_IN_ENDPOINT_CONFIG
        }
    }
}

pub fn is_default_endpoint_config_initialized() -> bool {
    DEFAULT_ENDPOINT_CONFIG.get().is_some()
}
