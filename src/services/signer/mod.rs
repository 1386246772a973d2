//! Signing methods backed by remote services.

mod vault_signing_method;
pub use vault_signing_method::*;
