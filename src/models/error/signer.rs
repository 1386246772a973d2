use serde::Serialize;
use thiserror::Error;

/// Failures of the Vault signing method.
///
/// Every variant is returned to the caller; none of them is fatal to the
/// process. `InvalidSignature` means Vault evaluated the signature and rejected
/// it, which callers usually treat differently from a failure to reach Vault.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SignerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credential: a non-empty Vault token is required")]
    MissingCredential,

    #[error("Type mismatch: expected {0}")]
    TypeMismatch(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Remote service rejected the request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("Malformed response from remote service: {0}")]
    RemoteResponseMalformed(String),

    #[error("Signature is invalid")]
    InvalidSignature,
}

impl SignerError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    ///
    /// Only `RemoteUnavailable` is transient: the request may succeed once Vault
    /// is reachable again. An `InvalidSignature` will not change on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, SignerError::RemoteUnavailable(_))
    }
}
