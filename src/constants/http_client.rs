/// Default Vault server address, matching the Vault CLI default.
pub const DEFAULT_VAULT_ADDRESS: &str = "https://127.0.0.1:8200";

/// Default HTTP client timeout in seconds.
/// Overall timeout for a single request to Vault.
pub const DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS: u64 = 60;

/// Default HTTP client connection timeout in seconds.
/// Maximum time to wait for establishing a connection.
pub const DEFAULT_HTTP_CLIENT_CONNECT_TIMEOUT_SECONDS: u64 = 10;

/// Default number of retries for transport failures. Zero disables retries.
pub const DEFAULT_HTTP_CLIENT_MAX_RETRIES: u32 = 0;

/// Delay between two attempts when retries are enabled, in milliseconds.
pub const HTTP_CLIENT_RETRY_DELAY_MS: u64 = 250;

/// Default maximum number of idle connections per host in the connection pool.
pub const DEFAULT_HTTP_CLIENT_POOL_MAX_IDLE_PER_HOST: usize = 25;

/// Default HTTP client pool idle timeout in seconds.
/// Time after which idle connections are closed.
pub const DEFAULT_HTTP_CLIENT_POOL_IDLE_TIMEOUT_SECONDS: u64 = 30;
