//! # vault-jwt
//!
//! A JWT signing method that delegates HMAC generation and verification to the
//! transit secrets engine of a HashiCorp Vault server. The key never leaves
//! Vault: signing asks Vault for an HMAC over the signing string, and
//! verification asks Vault whether a presented HMAC is valid.
//!
//! ```rust,ignore
//! use vault_jwt::{bootstrap, config, jwt, models::RemoteSigningConfig};
//!
//! bootstrap::initialize_vault_jwt(config::EndpointConfig::from_env()?)?;
//!
//! let key = RemoteSigningConfig::new("my-key", token);
//! let method = jwt::get_signing_method("Vault").expect("registered");
//! let signed = jwt::Token::new_with_claims(method, claims).signed_string(&key).await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod jwt;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
