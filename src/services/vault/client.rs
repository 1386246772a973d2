use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use std::time::Duration;

use super::{TransitClientTrait, VaultError};
use crate::{
    constants::{HTTP_CLIENT_RETRY_DELAY_MS, TRANSIT_HMAC_OPERATION, TRANSIT_VERIFY_OPERATION, VAULT_API_VERSION},
    utils::base64_encode,
};

/// Authenticated client for one Vault address and transit mount.
///
/// The token, namespace and request headers are installed as default headers
/// on the underlying `reqwest::Client` when the factory builds it.
#[derive(Debug, Clone)]
pub struct VaultTransitClient {
    http: Client,
    base_url: Url,
    mount_path: String,
    max_retries: u32,
}

impl VaultTransitClient {
    pub(super) fn new(http: Client, base_url: Url, mount_path: &str, max_retries: u32) -> Self {
        Self {
            http,
            base_url,
            mount_path: mount_path.to_string(),
            max_retries,
        }
    }

    /// `<address>/v1/<mount>/<operation>/<key_path>`, every segment escaped.
    pub fn operation_url(&self, operation: &str, key_path: &str) -> Result<Url, VaultError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                VaultError::ConfigError(format!(
                    "Vault address cannot be used as a base URL: {}",
                    self.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .push(VAULT_API_VERSION)
                .extend(self.mount_path.split('/').filter(|s| !s.is_empty()))
                .push(operation)
                .extend(key_path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    async fn post(&self, url: Url, body: &Value) -> Result<Value, VaultError> {
        let mut attempt: u32 = 0;
        loop {
            match self.send(url.clone(), body).await {
                Err(VaultError::TransportError(msg)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Vault request to {} failed (attempt {}/{}): {}",
                        url.path(),
                        attempt,
                        self.max_retries + 1,
                        msg
                    );
                    tokio::time::sleep(Duration::from_millis(HTTP_CLIENT_RETRY_DELAY_MS)).await;
                }
                result => return result,
            }
        }
    }

    async fn send(&self, url: Url, body: &Value) -> Result<Value, VaultError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VaultError::TransportError(format!("request timed out: {}", e))
                } else {
                    VaultError::TransportError(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VaultError::TransportError(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(VaultError::ApiError {
                status: status.as_u16(),
                message: vault_error_message(&text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| VaultError::ResponseError(format!("response is not valid JSON: {}", e)))
    }
}

/// Joins the `errors` array of a Vault error body, falling back to the raw body.
fn vault_error_message(body: &str) -> String {
    let errors = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value.get("errors").and_then(Value::as_array).map(|errors| {
            errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join("; ")
        })
    });

    match errors {
        Some(message) if !message.is_empty() => message,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.chars().take(256).collect(),
    }
}

/// Vault answers `verify` with 400 when the presented HMAC itself cannot be
/// parsed (missing `vault:v` prefix, bad version, MAC not base64). That is a
/// verdict on the signature, unlike 400s about the input or 401/403.
fn is_hmac_rejection(status: u16, message: &str) -> bool {
    status == StatusCode::BAD_REQUEST.as_u16() && message.to_ascii_lowercase().contains("hmac")
}

#[async_trait]
impl TransitClientTrait for VaultTransitClient {
    async fn generate_hmac(&self, key_path: &str, input: &[u8]) -> Result<String, VaultError> {
        let url = self.operation_url(TRANSIT_HMAC_OPERATION, key_path)?;
        debug!("Requesting HMAC from {}", url.path());

        let response = self
            .post(url, &json!({ "input": base64_encode(input) }))
            .await?;

        let hmac = response
            .get("data")
            .and_then(|data| data.get("hmac"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                VaultError::ResponseError("missing string field data.hmac".to_string())
            })?;

        Ok(hmac.to_string())
    }

    async fn verify_hmac(
        &self,
        key_path: &str,
        input: &[u8],
        hmac: &str,
    ) -> Result<bool, VaultError> {
        let url = self.operation_url(TRANSIT_VERIFY_OPERATION, key_path)?;
        debug!("Requesting HMAC verification from {}", url.path());

        let result = self
            .post(
                url,
                &json!({
                    "input": base64_encode(input),
                    "hmac": hmac,
                }),
            )
            .await;

        let response = match result {
            Err(VaultError::ApiError { status, message }) if is_hmac_rejection(status, &message) => {
                debug!("Vault refused to parse the presented HMAC: {}", message);
                return Ok(false);
            }
            result => result?,
        };

        response
            .get("data")
            .and_then(|data| data.get("valid"))
            .and_then(Value::as_bool)
            .ok_or_else(|| VaultError::ResponseError("missing boolean field data.valid".to_string()))
    }
}
