use log::debug;
use parking_lot::RwLock;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Certificate, Client, Url,
};
use std::{collections::HashMap, fs, sync::Arc, time::Duration};

use super::{TransitClientFactoryTrait, TransitClientTrait, VaultTransitClient};
use crate::{
    config::{default_endpoint_config, EndpointConfig},
    constants::{
        DEFAULT_HTTP_CLIENT_POOL_IDLE_TIMEOUT_SECONDS, DEFAULT_HTTP_CLIENT_POOL_MAX_IDLE_PER_HOST,
        VAULT_NAMESPACE_HEADER, VAULT_REQUEST_HEADER, VAULT_TOKEN_HEADER,
    },
    models::{RemoteSigningConfig, SecretString, SignerError},
    utils::mask_url,
};

// Everything that determines a built client, the token included, so a cached
// client is only ever reused for the same credentials.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ClientCacheKey {
    endpoint: EndpointConfig,
    mount_path: String,
    tls_enabled: bool,
    auth_token: SecretString,
}

/// Builds `VaultTransitClient`s by merging caller overrides onto a base
/// endpoint configuration.
///
/// Without an explicit base, the process-wide default from
/// `config::default_endpoint_config` is read at build time.
#[derive(Default)]
pub struct VaultClientFactory {
    base: Option<Arc<EndpointConfig>>,
    cache: Option<RwLock<HashMap<ClientCacheKey, Arc<VaultTransitClient>>>>,
}

impl VaultClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_config(base: EndpointConfig) -> Self {
        Self {
            base: Some(Arc::new(base)),
            cache: None,
        }
    }

    /// Reuses built clients for identical configurations.
    pub fn with_client_cache(mut self) -> Self {
        self.cache = Some(RwLock::new(HashMap::new()));
        self
    }

    pub fn base_config(&self) -> &EndpointConfig {
        match &self.base {
            Some(base) => base,
            None => default_endpoint_config(),
        }
    }

    /// The endpoint configuration a client for `config` would use.
    pub fn resolve_endpoint(&self, config: &RemoteSigningConfig) -> EndpointConfig {
        self.base_config().merge(&config.endpoint)
    }

    pub fn cached_clients(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.read().len())
    }

    pub fn build(&self, config: &RemoteSigningConfig) -> Result<Arc<VaultTransitClient>, SignerError> {
        config.validate()?;

        let endpoint = self.resolve_endpoint(config);
        endpoint
            .validate()
            .map_err(|e| SignerError::Configuration(e.to_string()))?;

        let Some(cache) = &self.cache else {
            return Ok(Arc::new(create_client(&endpoint, config)?));
        };

        let cache_key = ClientCacheKey {
            endpoint,
            mount_path: config.mount_path.clone(),
            tls_enabled: config.tls_enabled,
            auth_token: config.auth_token.clone(),
        };

        if let Some(client) = cache.read().get(&cache_key) {
            return Ok(Arc::clone(client));
        }

        let mut cache = cache.write();
        // Another caller may have built it while we waited for the write lock
        if let Some(client) = cache.get(&cache_key) {
            return Ok(Arc::clone(client));
        }
        let client = Arc::new(create_client(&cache_key.endpoint, config)?);
        cache.insert(cache_key, Arc::clone(&client));
        Ok(client)
    }
}

impl TransitClientFactoryTrait for VaultClientFactory {
    fn build_client(
        &self,
        config: &RemoteSigningConfig,
    ) -> Result<Arc<dyn TransitClientTrait>, SignerError> {
        let client: Arc<dyn TransitClientTrait> = self.build(config)?;
        Ok(client)
    }
}

fn parse_address(endpoint: &EndpointConfig, tls_enabled: bool) -> Result<Url, SignerError> {
    let url = Url::parse(&endpoint.address).map_err(|e| {
        SignerError::Configuration(format!("Invalid Vault address: {}", e))
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(SignerError::Configuration(format!(
            "Vault address must be an http or https URL: {}",
            mask_url(&endpoint.address)
        )));
    }

    if tls_enabled && url.scheme() != "https" {
        return Err(SignerError::Configuration(format!(
            "TLS is enabled but the Vault address is not https: {}",
            mask_url(&endpoint.address)
        )));
    }

    Ok(url)
}

fn default_headers(
    endpoint: &EndpointConfig,
    auth_token: &SecretString,
) -> Result<HeaderMap, SignerError> {
    let mut token = HeaderValue::from_str(auth_token.as_str()).map_err(|_| {
        SignerError::Configuration("Vault token contains invalid header characters".to_string())
    })?;
    token.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(VAULT_TOKEN_HEADER, token);
    headers.insert(VAULT_REQUEST_HEADER, HeaderValue::from_static("true"));

    if let Some(namespace) = &endpoint.namespace {
        let namespace = HeaderValue::from_str(namespace).map_err(|_| {
            SignerError::Configuration(format!("Invalid Vault namespace: {}", namespace))
        })?;
        headers.insert(VAULT_NAMESPACE_HEADER, namespace);
    }

    Ok(headers)
}

fn load_ca_certificate(path: &str) -> Result<Certificate, SignerError> {
    let pem = fs::read(path).map_err(|e| {
        SignerError::Configuration(format!("Failed to read CA certificate {}: {}", path, e))
    })?;
    Certificate::from_pem(&pem).map_err(|e| {
        SignerError::Configuration(format!("Invalid CA certificate {}: {}", path, e))
    })
}

fn create_client(
    endpoint: &EndpointConfig,
    config: &RemoteSigningConfig,
) -> Result<VaultTransitClient, SignerError> {
    let base_url = parse_address(endpoint, config.tls_enabled)?;

    let mut builder = Client::builder()
        .timeout(endpoint.timeout)
        .connect_timeout(endpoint.connect_timeout)
        .pool_max_idle_per_host(DEFAULT_HTTP_CLIENT_POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Duration::from_secs(
            DEFAULT_HTTP_CLIENT_POOL_IDLE_TIMEOUT_SECONDS,
        ))
        .default_headers(default_headers(endpoint, &config.auth_token)?);

    if config.tls_enabled {
        builder = builder.https_only(true);
    }

    if let Some(ca_cert) = &endpoint.ca_cert {
        builder = builder.add_root_certificate(load_ca_certificate(ca_cert)?);
    }

    let http = builder.build().map_err(|e| {
        SignerError::Configuration(format!("Failed to build HTTP client: {}", e))
    })?;

    debug!(
        "Built Vault transit client for {} (mount: {}, tls: {})",
        mask_url(&endpoint.address),
        config.mount_path,
        config.tls_enabled
    );

    Ok(VaultTransitClient::new(
        http,
        base_url,
        &config.mount_path,
        endpoint.max_retries,
    ))
}
