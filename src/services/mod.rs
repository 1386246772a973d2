//! # Services Module
//!
//! Implements the Vault transit integration and the JWT signing method built on it.

pub mod vault;

mod signer;
pub use signer::*;
