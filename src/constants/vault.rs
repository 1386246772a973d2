//! Vault transit constants

/// Name under which the signing method is registered with the token framework.
pub const VAULT_SIGNING_METHOD_NAME: &str = "Vault";

/// Default mount point of the transit secrets engine.
pub const DEFAULT_TRANSIT_MOUNT_PATH: &str = "transit";

/// Operation prefix of the HMAC generation endpoint, relative to the mount.
pub const TRANSIT_HMAC_OPERATION: &str = "hmac";

/// Operation prefix of the HMAC verification endpoint, relative to the mount.
pub const TRANSIT_VERIFY_OPERATION: &str = "verify";

/// API version segment prepended to every Vault request path.
pub const VAULT_API_VERSION: &str = "v1";

/// Request headers understood by Vault (header names are case-insensitive).
pub const VAULT_TOKEN_HEADER: &str = "x-vault-token";
pub const VAULT_NAMESPACE_HEADER: &str = "x-vault-namespace";
pub const VAULT_REQUEST_HEADER: &str = "x-vault-request";

/// Environment variables read by `EndpointConfig::from_env`.
pub const VAULT_ADDR_ENV: &str = "VAULT_ADDR";
pub const VAULT_CLIENT_TIMEOUT_ENV: &str = "VAULT_CLIENT_TIMEOUT";
pub const VAULT_MAX_RETRIES_ENV: &str = "VAULT_MAX_RETRIES";
pub const VAULT_NAMESPACE_ENV: &str = "VAULT_NAMESPACE";
pub const VAULT_CACERT_ENV: &str = "VAULT_CACERT";
