//! JWT signing method that delegates HMAC computation to Vault's transit engine.
//!
//! Signing asks Vault for an HMAC over the signing string and returns the
//! `vault:v<N>:<mac>` string Vault produced, encoded as a token segment.
//! Verification decodes that segment and lets Vault's `verify` endpoint decide;
//! the key never leaves Vault.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::{
    constants::VAULT_SIGNING_METHOD_NAME,
    jwt::{decode_segment, encode_segment, register_signing_method, SigningKey, SigningMethod},
    models::{RemoteSigningConfig, SignerError},
    services::vault::{TransitClientFactoryTrait, VaultClientFactory},
};

pub struct VaultSigningMethod {
    factory: Arc<dyn TransitClientFactoryTrait>,
}

impl Default for VaultSigningMethod {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultSigningMethod {
    /// Uses a `VaultClientFactory` reading the process-wide endpoint defaults.
    pub fn new() -> Self {
        Self::with_factory(Arc::new(VaultClientFactory::new()))
    }

    pub fn with_factory(factory: Arc<dyn TransitClientFactoryTrait>) -> Self {
        Self { factory }
    }

    /// Accepts a `RemoteSigningConfig` or an `Arc<RemoteSigningConfig>`.
    fn signing_config(key: &SigningKey) -> Result<&RemoteSigningConfig, SignerError> {
        key.downcast_ref::<RemoteSigningConfig>()
            .or_else(|| {
                key.downcast_ref::<Arc<RemoteSigningConfig>>()
                    .map(|config| config.as_ref())
            })
            .ok_or_else(|| SignerError::TypeMismatch("RemoteSigningConfig".to_string()))
    }
}

#[async_trait]
impl SigningMethod for VaultSigningMethod {
    fn alg(&self) -> &str {
        VAULT_SIGNING_METHOD_NAME
    }

    async fn sign(&self, signing_string: &str, key: &SigningKey) -> Result<String, SignerError> {
        let config = Self::signing_config(key)?;
        let client = self.factory.build_client(config)?;

        let hmac = client
            .generate_hmac(&config.key_path, signing_string.as_bytes())
            .await?;
        debug!("Signed with Vault transit key {}", config.key_path);

        Ok(encode_segment(hmac.as_bytes()))
    }

    async fn verify(
        &self,
        signing_string: &str,
        signature: &str,
        key: &SigningKey,
    ) -> Result<(), SignerError> {
        let decoded = decode_segment(signature)
            .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
        // Vault judges the bytes; a tampered byte that breaks UTF-8 must still reach it
        let hmac = String::from_utf8_lossy(&decoded);

        let config = Self::signing_config(key)?;
        let client = self.factory.build_client(config)?;

        let valid = client
            .verify_hmac(&config.key_path, signing_string.as_bytes(), &hmac)
            .await?;

        if valid {
            Ok(())
        } else {
            debug!("Vault rejected signature for transit key {}", config.key_path);
            Err(SignerError::InvalidSignature)
        }
    }
}

/// Registers `method` under the `Vault` algorithm name. Every lookup of the
/// name returns this same instance, so a client cache configured on its
/// factory is shared. Returns `true` if a previous registration was replaced.
pub fn register_vault_signing_method_with(method: VaultSigningMethod) -> bool {
    let method: Arc<dyn SigningMethod> = Arc::new(method);
    register_signing_method(VAULT_SIGNING_METHOD_NAME, move || Arc::clone(&method))
}

/// Registers the Vault signing method with the process-wide endpoint defaults.
pub fn register_vault_signing_method() -> bool {
    register_vault_signing_method_with(VaultSigningMethod::new())
}
