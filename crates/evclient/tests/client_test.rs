// Integration tests for `EvClient` construction, headers and response
// classification using wiremock.
#![allow(clippy::unwrap_used)]

use figment::Jail;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use evclient::{ApiResponse, ClientArgs, ClientConfig, ConfigError, Error, EvClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, EvClient) {
    let server = MockServer::start().await;
    let config = ClientConfig::new("test", "123456789", &server.uri()).unwrap();
    let client = EvClient::from_config(&config, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn test_missing_domain_fails_before_any_request() {
    Jail::expect_with(|jail| {
        jail.set_env("EV_DOMAIN", "");
        jail.set_env("EV_API_KEY", "123456789");

        let err = EvClient::from_env().unwrap_err();
        assert!(
            matches!(err, Error::Configuration(ConfigError::MissingDomain)),
            "got {err:?}"
        );
        Ok(())
    });
}

#[test]
fn test_missing_api_key_fails_before_any_request() {
    Jail::expect_with(|jail| {
        jail.set_env("EV_API_KEY", "");

        let err = EvClient::new(&ClientArgs::new().domain("test")).unwrap_err();
        assert!(
            matches!(err, Error::Configuration(ConfigError::MissingApiKey)),
            "got {err:?}"
        );
        Ok(())
    });
}

#[test]
fn test_env_fallback_builds_default_endpoint_url() {
    Jail::expect_with(|jail| {
        jail.set_env("EV_DOMAIN", "test");
        jail.set_env("EV_API_KEY", "123456789");
        jail.set_env("EV_ENDPOINT_URL", "");

        let client = EvClient::from_env().unwrap();
        assert_eq!(client.domain(), "test");
        assert_eq!(
            client.base_url().as_str(),
            "https://customer.noda.se/test/api/v1"
        );
        Ok(())
    });
}

#[test]
fn test_explicit_args_override_env() {
    Jail::expect_with(|jail| {
        jail.set_env("EV_DOMAIN", "from-env");
        jail.set_env("EV_API_KEY", "123456789");

        let client = EvClient::new(
            &ClientArgs::new()
                .domain("explicit")
                .endpoint_url("http://localhost:3000"),
        )
        .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "http://localhost:3000/explicit/api/v1"
        );
        Ok(())
    });
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_request_carries_auth_and_accept() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/nodes"))
        .and(header("Authorization", "Key 123456789"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let nodes = client.get_nodes().await.unwrap();
    assert!(nodes.is_empty());
}

// ── Response classification ─────────────────────────────────────────

#[tokio::test]
async fn test_not_found_carries_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/nodes"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "no such node" })))
        .mount(&server)
        .await;

    let err = client.get_nodes().await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), Some("no such node"));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_client_error_without_json_uses_default_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/tags"))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .mount(&server)
        .await;

    let err = client.get_tags().await.unwrap_err();
    match err {
        Error::Unauthorized { message } => assert_eq!(message, "Unauthorized"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unlisted_client_error_is_unexpected_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/tags"))
        .respond_with(ResponseTemplate::new(418).set_body_json(json!({ "error": "teapot" })))
        .mount(&server)
        .await;

    let err = client.get_tags().await.unwrap_err();
    assert!(
        matches!(&err, Error::UnexpectedStatusCode { status: 418, message } if message == "teapot"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_server_error_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/nodes"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": "db down" })))
        .mount(&server)
        .await;

    let err = client.get_nodes().await.unwrap_err();
    assert!(matches!(err, Error::InternalServerError { status: 503, .. }));
    assert_eq!(err.message(), Some("Internal Server Error"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/nodes"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_nodes().await.unwrap_err();
    assert!(matches!(err, Error::TooManyRequests { .. }));
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"nodes\": [", "application/json"))
        .mount(&server)
        .await;

    let err = client.get_nodes().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unwrapped_endpoint_via_request_and_execute() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/test/api/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("a: 1\n", "application/yaml"))
        .mount(&server)
        .await;

    let builder = client.request(reqwest::Method::GET, "reports").unwrap();
    let resp = client.execute(builder).await.unwrap();
    assert_eq!(resp, ApiResponse::Parsed(json!({ "a": 1 })));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = ClientConfig::new("test", "123456789", "http://127.0.0.1:1").unwrap();
    let client = EvClient::from_config(&config, &TransportConfig::default()).unwrap();

    let err = client.get_nodes().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}
