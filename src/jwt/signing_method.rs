use async_trait::async_trait;
use std::any::Any;

use crate::models::SignerError;

/// Key handed to a signing method. Each method downcasts it to the concrete
/// key type it understands and reports `SignerError::TypeMismatch` otherwise.
pub type SigningKey = dyn Any + Send + Sync;

/// A JWT signing algorithm, registered by name in a `SigningMethodRegistry`.
#[async_trait]
pub trait SigningMethod: Send + Sync {
    /// Value of the `alg` header for tokens produced by this method.
    fn alg(&self) -> &str;

    /// Returns the encoded signature segment for `signing_string`.
    async fn sign(&self, signing_string: &str, key: &SigningKey) -> Result<String, SignerError>;

    /// Checks an encoded signature segment against `signing_string`.
    async fn verify(
        &self,
        signing_string: &str,
        signature: &str,
        key: &SigningKey,
    ) -> Result<(), SignerError>;
}
