use thiserror::Error;

use super::SignerError;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unknown signing method: {0}")]
    UnknownSigningMethod(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Signing method error: {0}")]
    Signer(#[from] SignerError),

    #[error("Token is expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotValidYet,

    #[error("Token used before issued")]
    IssuedInFuture,
}

impl TokenError {
    /// Returns the signing method error, if this failure came from one.
    pub fn signer_error(&self) -> Option<&SignerError> {
        match self {
            TokenError::Signer(e) => Some(e),
            _ => None,
        }
    }
}
