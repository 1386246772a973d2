use serde::{Deserialize, Serialize};

use crate::models::TokenError;

/// Claims that can check their own time-based validity.
pub trait Claims {
    /// Validates the claims at Unix time `now`. The default accepts everything.
    fn validate(&self, _now: i64) -> Result<(), TokenError> {
        Ok(())
    }
}

/// The registered claim names of RFC 7519, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims for RegisteredClaims {
    fn validate(&self, now: i64) -> Result<(), TokenError> {
        if matches!(self.exp, Some(exp) if now > exp) {
            return Err(TokenError::Expired);
        }
        if matches!(self.iat, Some(iat) if now < iat) {
            return Err(TokenError::IssuedInFuture);
        }
        if matches!(self.nbf, Some(nbf) if now < nbf) {
            return Err(TokenError::NotValidYet);
        }
        Ok(())
    }
}

impl Claims for serde_json::Value {}
