//! Vault JWT initialization
//!
//! Installs the process-wide Vault endpoint and registers the `Vault` signing
//! method so tokens with `"alg": "Vault"` can be produced and parsed.

use log::info;

use crate::{
    config::{init_default_endpoint_config, EndpointConfig, EndpointConfigError},
    constants::VAULT_SIGNING_METHOD_NAME,
    services::register_vault_signing_method,
};

/// Initializes the Vault signing method for this process.
///
/// # Arguments
///
/// * `endpoint` - Base endpoint every signing configuration is merged onto
///
/// # Returns
///
/// * `Ok(())` - Endpoint installed and signing method registered
/// * `Err` - If the endpoint is invalid or a different one was already installed
pub fn initialize_vault_jwt(endpoint: EndpointConfig) -> Result<(), EndpointConfigError> {
    init_default_endpoint_config(endpoint)?;

    if register_vault_signing_method() {
        info!(
            "Replaced existing '{}' signing method registration",
            VAULT_SIGNING_METHOD_NAME
        );
    } else {
        info!("Registered '{}' signing method", VAULT_SIGNING_METHOD_NAME);
    }

    Ok(())
}

/// Reads the endpoint from `VAULT_*` environment variables and initializes
/// the signing method with it.
pub fn initialize_vault_jwt_from_env() -> Result<(), EndpointConfigError> {
    initialize_vault_jwt(EndpointConfig::from_env()?)
}
