//! Startup routines for the Vault JWT signing method.
//!
//! # Submodules
//!
//! - `initialize_vault_jwt`: installs the default endpoint and registers the signing method
mod initialize_vault_jwt;
pub use initialize_vault_jwt::*;
