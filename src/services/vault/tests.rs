use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{EndpointConfig, EndpointOverrides};
use crate::models::{RemoteSigningConfig, SecretString, SignerError};
use crate::services::vault::{
    TransitClientFactoryTrait, TransitClientTrait, VaultClientFactory, VaultError,
};
use crate::utils::base64_encode;

fn factory_for(address: &str) -> VaultClientFactory {
    VaultClientFactory::with_base_config(EndpointConfig {
        address: address.to_string(),
        timeout: Duration::from_secs(5),
        ..EndpointConfig::default()
    })
}

fn signing_config(key_path: &str, token: &str) -> RemoteSigningConfig {
    RemoteSigningConfig::new(key_path, SecretString::new(token))
}

#[tokio::test]
async fn test_generate_hmac_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .and(header("X-Vault-Token", "t1"))
        .and(header("X-Vault-Request", "true"))
        .and(body_json(json!({
            "input": base64_encode(b"abc")
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "test-request-id",
            "lease_id": "",
            "renewable": false,
            "lease_duration": 0,
            "data": {
                "hmac": "vault:v1:deadbeef"
            },
            "wrap_info": null,
            "warnings": null,
            "auth": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    let hmac = client.generate_hmac("foo", b"abc").await.unwrap();
    assert_eq!(hmac, "vault:v1:deadbeef");
}

#[tokio::test]
async fn test_generate_hmac_uses_custom_mount() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/jwt-transit/hmac/team/signing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "hmac": "vault:v1:abc" } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = signing_config("team/signing", "t1").with_mount_path("jwt-transit");
    let client = factory_for(&mock_server.uri()).build(&config).unwrap();

    let hmac = client
        .generate_hmac(&config.key_path, b"abc")
        .await
        .unwrap();
    assert_eq!(hmac, "vault:v1:abc");
}

#[tokio::test]
async fn test_generate_hmac_missing_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "signature": "x" } })),
        )
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert!(matches!(result, Err(VaultError::ResponseError(msg)) if msg.contains("data.hmac")));
}

#[tokio::test]
async fn test_generate_hmac_wrong_field_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "hmac": 42 } })))
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert!(matches!(result, Err(VaultError::ResponseError(_))));
}

#[tokio::test]
async fn test_generate_hmac_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert!(matches!(result, Err(VaultError::ResponseError(msg)) if msg.contains("JSON")));
}

#[tokio::test]
async fn test_generate_hmac_permission_denied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })),
        )
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert_eq!(
        result,
        Err(VaultError::ApiError {
            status: 403,
            message: "permission denied".to_string()
        })
    );
}

#[tokio::test]
async fn test_verify_hmac_valid_and_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/verify/foo"))
        .and(body_json(json!({
            "input": base64_encode(b"abc"),
            "hmac": "vault:v1:good"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "valid": true } })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/verify/foo"))
        .and(body_json(json!({
            "input": base64_encode(b"abc"),
            "hmac": "vault:v1:bad"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "valid": false } })))
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    assert!(client.verify_hmac("foo", b"abc", "vault:v1:good").await.unwrap());
    assert!(!client.verify_hmac("foo", b"abc", "vault:v1:bad").await.unwrap());
}

#[tokio::test]
async fn test_verify_hmac_non_boolean_valid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/verify/foo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "valid": "true" } })),
        )
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    let result = client.verify_hmac("foo", b"abc", "vault:v1:x").await;
    assert!(matches!(result, Err(VaultError::ResponseError(msg)) if msg.contains("data.valid")));
}

#[tokio::test]
async fn test_verify_hmac_unparseable_hmac_is_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/verify/foo"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["invalid HMAC to verify: no prefix"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = factory_for(&mock_server.uri())
        .build(&signing_config("foo", "t1"))
        .unwrap();

    assert_eq!(
        client.verify_hmac("foo", b"abc", "xault:v1:abc").await,
        Ok(false)
    );
}

#[tokio::test]
async fn test_verify_hmac_other_client_errors_are_api_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/verify/foo"))
        .and(header("X-Vault-Token", "t1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["unable to decode input as base64"]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/verify/foo"))
        .and(header("X-Vault-Token", "t2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": ["permission denied"]
        })))
        .mount(&mock_server)
        .await;

    let factory = factory_for(&mock_server.uri());

    let bad_input = factory
        .build(&signing_config("foo", "t1"))
        .unwrap()
        .verify_hmac("foo", b"abc", "vault:v1:abc")
        .await;
    assert_eq!(
        bad_input,
        Err(VaultError::ApiError {
            status: 400,
            message: "unable to decode input as base64".to_string()
        })
    );

    let denied = factory
        .build(&signing_config("foo", "t2"))
        .unwrap()
        .verify_hmac("foo", b"abc", "vault:v1:abc")
        .await;
    assert_eq!(
        denied,
        Err(VaultError::ApiError {
            status: 403,
            message: "permission denied".to_string()
        })
    );
}

#[tokio::test]
async fn test_namespace_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .and(header("X-Vault-Namespace", "team-a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "hmac": "vault:v1:ns" } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = signing_config("foo", "t1")
        .with_endpoint(EndpointOverrides::default().with_namespace("team-a"));
    let client = factory_for(&mock_server.uri()).build(&config).unwrap();

    assert_eq!(
        client.generate_hmac("foo", b"abc").await.unwrap(),
        "vault:v1:ns"
    );
}

#[tokio::test]
async fn test_override_address_wins_over_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "hmac": "vault:v1:ovr" } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Base points at a closed port; the caller override must be used instead
    let factory = factory_for("http://127.0.0.1:1");
    let config = signing_config("foo", "t1")
        .with_endpoint(EndpointOverrides::default().with_address(mock_server.uri()));

    let client = factory.build(&config).unwrap();
    assert_eq!(
        client.generate_hmac("foo", b"abc").await.unwrap(),
        "vault:v1:ovr"
    );
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "hmac": "vault:v1:late" } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = signing_config("foo", "t1").with_endpoint(
        EndpointOverrides::default().with_timeout(Duration::from_millis(200)),
    );
    let client = factory_for(&mock_server.uri()).build(&config).unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert!(matches!(result, Err(VaultError::TransportError(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error_after_retries() {
    let config = signing_config("foo", "t1")
        .with_endpoint(EndpointOverrides::default().with_max_retries(2));
    let client = factory_for("http://127.0.0.1:1").build(&config).unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert!(matches!(result, Err(VaultError::TransportError(_))));
}

#[tokio::test]
async fn test_api_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transit/hmac/foo"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "errors": ["Vault is sealed"] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = signing_config("foo", "t1")
        .with_endpoint(EndpointOverrides::default().with_max_retries(3));
    let client = factory_for(&mock_server.uri()).build(&config).unwrap();

    let result = client.generate_hmac("foo", b"abc").await;
    assert_eq!(
        result,
        Err(VaultError::ApiError {
            status: 503,
            message: "Vault is sealed".to_string()
        })
    );
}

#[test]
fn test_build_rejects_missing_token() {
    let factory = factory_for("http://127.0.0.1:8200");
    let result = factory.build(&signing_config("foo", ""));
    assert!(matches!(result, Err(SignerError::MissingCredential)));
}

#[test]
fn test_build_rejects_empty_key_path() {
    let factory = factory_for("http://127.0.0.1:8200");
    let result = factory.build(&signing_config("", "t1"));
    assert!(matches!(result, Err(SignerError::Configuration(_))));
}

#[test]
fn test_build_rejects_invalid_merged_address() {
    let factory = factory_for("http://127.0.0.1:8200");
    let config = signing_config("foo", "t1")
        .with_endpoint(EndpointOverrides::default().with_address("not a url"));
    assert!(matches!(
        factory.build(&config),
        Err(SignerError::Configuration(_))
    ));
}

#[test]
fn test_build_rejects_non_http_scheme() {
    let factory = factory_for("ftp://vault.example.com");
    assert!(matches!(
        factory.build(&signing_config("foo", "t1")),
        Err(SignerError::Configuration(msg)) if msg.contains("http or https")
    ));
}

#[test]
fn test_build_with_tls_requires_https_address() {
    let factory = factory_for("http://127.0.0.1:8200");
    let config = signing_config("foo", "t1").with_tls(true);
    assert!(matches!(
        factory.build(&config),
        Err(SignerError::Configuration(msg)) if msg.contains("TLS")
    ));
}

#[test]
fn test_build_with_tls_and_https_address() {
    let factory = factory_for("https://vault.example.com:8200");
    let config = signing_config("foo", "t1").with_tls(true);
    assert!(factory.build(&config).is_ok());
}

#[test]
fn test_build_rejects_unreadable_ca_certificate() {
    let factory = factory_for("https://vault.example.com:8200");
    let config = signing_config("foo", "t1")
        .with_tls(true)
        .with_endpoint(EndpointOverrides::default().with_ca_cert("/nonexistent/ca.pem"));
    assert!(matches!(
        factory.build(&config),
        Err(SignerError::Configuration(msg)) if msg.contains("CA certificate")
    ));
}

#[test]
fn test_build_rejects_invalid_ca_certificate() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"not a certificate").unwrap();

    let factory = factory_for("https://vault.example.com:8200");
    let config = signing_config("foo", "t1").with_tls(true).with_endpoint(
        EndpointOverrides::default().with_ca_cert(file.path().to_string_lossy().to_string()),
    );
    assert!(matches!(
        factory.build(&config),
        Err(SignerError::Configuration(_))
    ));
}

#[test]
fn test_build_rejects_token_with_invalid_header_characters() {
    let factory = factory_for("http://127.0.0.1:8200");
    assert!(matches!(
        factory.build(&signing_config("foo", "t1\nX-Injected: 1")),
        Err(SignerError::Configuration(msg)) if msg.contains("token")
    ));
}

#[test]
fn test_resolve_endpoint_merges_overrides() {
    let factory = VaultClientFactory::with_base_config(EndpointConfig {
        address: "default:8200".to_string(),
        timeout: Duration::from_secs(5),
        ..EndpointConfig::default()
    });
    let config = signing_config("foo", "t1")
        .with_endpoint(EndpointOverrides::default().with_address("override:9200"));

    let resolved = factory.resolve_endpoint(&config);
    assert_eq!(resolved.address, "override:9200");
    assert_eq!(resolved.timeout, Duration::from_secs(5));
    // The caller config itself is left untouched
    assert_eq!(config.endpoint.address.as_deref(), Some("override:9200"));
    assert_eq!(config.endpoint.timeout, None);
}

#[test]
fn test_client_cache_reuses_clients_per_token() {
    let factory = factory_for("http://127.0.0.1:8200").with_client_cache();

    let first = factory.build(&signing_config("foo", "t1")).unwrap();
    let again = factory.build(&signing_config("foo", "t1")).unwrap();
    let other_token = factory.build(&signing_config("foo", "t2")).unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert!(!Arc::ptr_eq(&first, &other_token));
    assert_eq!(factory.cached_clients(), 2);
}

#[test]
fn test_client_cache_disabled_by_default() {
    let factory = factory_for("http://127.0.0.1:8200");

    let first = factory.build(&signing_config("foo", "t1")).unwrap();
    let again = factory.build(&signing_config("foo", "t1")).unwrap();

    assert!(!Arc::ptr_eq(&first, &again));
    assert_eq!(factory.cached_clients(), 0);
}

#[test]
fn test_client_cache_does_not_store_failures() {
    let factory = factory_for("http://127.0.0.1:8200").with_client_cache();
    assert!(factory.build(&signing_config("foo", "")).is_err());
    assert_eq!(factory.cached_clients(), 0);
}

#[test]
fn test_factory_trait_returns_client() {
    let factory = factory_for("http://127.0.0.1:8200");
    let factory: &dyn TransitClientFactoryTrait = &factory;
    assert!(factory.build_client(&signing_config("foo", "t1")).is_ok());
    assert!(matches!(
        factory.build_client(&signing_config("foo", "")),
        Err(SignerError::MissingCredential)
    ));
}

#[test]
fn test_vault_error_maps_to_signer_error() {
    assert_eq!(
        SignerError::from(VaultError::TransportError("connection refused".to_string())),
        SignerError::RemoteUnavailable("connection refused".to_string())
    );
    assert!(matches!(
        SignerError::from(VaultError::ApiError {
            status: 503,
            message: "Vault is sealed".to_string()
        }),
        SignerError::RemoteUnavailable(_)
    ));
    assert!(matches!(
        SignerError::from(VaultError::ApiError {
            status: 429,
            message: "rate limited".to_string()
        }),
        SignerError::RemoteUnavailable(_)
    ));
    assert_eq!(
        SignerError::from(VaultError::ApiError {
            status: 400,
            message: "encryption key not found".to_string()
        }),
        SignerError::RemoteRejected {
            status: 400,
            message: "encryption key not found".to_string()
        }
    );
    assert_eq!(
        SignerError::from(VaultError::ResponseError("missing".to_string())),
        SignerError::RemoteResponseMalformed("missing".to_string())
    );
    assert_eq!(
        SignerError::from(VaultError::ConfigError("bad".to_string())),
        SignerError::Configuration("bad".to_string())
    );
}
