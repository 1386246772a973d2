use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use super::{
    decode_segment, encode_segment, Claims, SigningKey, SigningMethod, SigningMethodRegistry,
};
use crate::{models::TokenError, utils::now_timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// An unsigned token bound to the signing method that will sign it.
pub struct Token<C> {
    pub header: Header,
    pub claims: C,
    method: Arc<dyn SigningMethod>,
}

impl<C: Serialize> Token<C> {
    pub fn new_with_claims(method: Arc<dyn SigningMethod>, claims: C) -> Self {
        Self {
            header: Header {
                alg: method.alg().to_string(),
                typ: Some("JWT".to_string()),
                kid: None,
            },
            claims,
            method,
        }
    }

    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.header.kid = Some(kid.into());
        self
    }

    /// `<header segment>.<claims segment>`, the bytes the signature covers.
    pub fn signing_string(&self) -> Result<String, TokenError> {
        let header = encode_segment(&serde_json::to_vec(&self.header)?);
        let claims = encode_segment(&serde_json::to_vec(&self.claims)?);
        Ok(format!("{}.{}", header, claims))
    }

    /// Signs the token with `key` and returns the compact serialization.
    pub async fn signed_string(&self, key: &SigningKey) -> Result<String, TokenError> {
        let signing_string = self.signing_string()?;
        let signature = self.method.sign(&signing_string, key).await?;
        Ok(format!("{}.{}", signing_string, signature))
    }
}

/// A parsed token whose signature and claims have been validated.
#[derive(Debug, Clone)]
pub struct TokenData<C> {
    pub header: Header,
    pub claims: C,
    pub signature: String,
}

/// Parses and verifies `token` using the process-wide registry.
pub async fn parse_with_claims<C>(token: &str, key: &SigningKey) -> Result<TokenData<C>, TokenError>
where
    C: DeserializeOwned + Claims,
{
    parse_with_claims_using(SigningMethodRegistry::global(), token, key).await
}

/// Parses `token`, resolves its `alg` through `registry`, verifies the
/// signature with `key`, then decodes and validates the claims.
pub async fn parse_with_claims_using<C>(
    registry: &SigningMethodRegistry,
    token: &str,
    key: &SigningKey,
) -> Result<TokenData<C>, TokenError>
where
    C: DeserializeOwned + Claims,
{
    let parts: Vec<&str> = token.split('.').collect();
    let [header_segment, claims_segment, signature] = parts.as_slice() else {
        return Err(TokenError::Malformed(
            "token contains an invalid number of segments".to_string(),
        ));
    };

    let header_bytes = decode_segment(header_segment)
        .map_err(|e| TokenError::Malformed(format!("could not decode header: {}", e)))?;
    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|e| TokenError::Malformed(format!("could not parse header: {}", e)))?;

    let method = registry
        .get(&header.alg)
        .ok_or_else(|| TokenError::UnknownSigningMethod(header.alg.clone()))?;

    let signing_string = &token[..header_segment.len() + 1 + claims_segment.len()];
    method.verify(signing_string, signature, key).await?;

    let claims_bytes = decode_segment(claims_segment)
        .map_err(|e| TokenError::Malformed(format!("could not decode claims: {}", e)))?;
    let claims: C = serde_json::from_slice(&claims_bytes)?;
    claims.validate(now_timestamp())?;

    debug!("Token verified with signing method {}", header.alg);

    Ok(TokenData {
        header,
        claims,
        signature: signature.to_string(),
    })
}
