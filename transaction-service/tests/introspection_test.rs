//! HTTP introspection client against a mock authorization server.

use secrecy::Secret;
use serde_json::json;
use transaction_service::config::IntrospectionConfig;
use transaction_service::services::{HttpIntrospector, IntrospectionError, TokenIntrospector};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("test_gateway_client:changeme")
const BASIC_CREDENTIALS: &str = "Basic dGVzdF9nYXRld2F5X2NsaWVudDpjaGFuZ2VtZQ==";

fn settings(endpoint: String) -> IntrospectionConfig {
    IntrospectionConfig {
        endpoint,
        client_id: "test_gateway_client".to_string(),
        client_secret: Secret::new("changeme".to_string()),
        verify_tls: false,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn posts_token_form_with_client_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/introspection"))
        .and(header("authorization", BASIC_CREDENTIALS))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("x-request-id", "req-1"))
        .and(body_string_contains("token=opaque-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "active": true,
            "scope": "openid transactionId4",
            "client_id": "test_gateway_client",
            "sub": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let introspector =
        HttpIntrospector::new(settings(format!("{}/introspection", server.uri()))).unwrap();
    let token = introspector
        .introspect("opaque-123", Some("req-1"))
        .await
        .unwrap();

    assert!(token.active);
    assert_eq!(token.scope(), "openid transactionId4");
    assert_eq!(token.sub.as_deref(), Some("alice"));
}

#[tokio::test]
async fn inactive_response_has_no_scope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/introspection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "active": false })))
        .mount(&server)
        .await;

    let introspector =
        HttpIntrospector::new(settings(format!("{}/introspection", server.uri()))).unwrap();
    let token = introspector.introspect("expired", None).await.unwrap();

    assert!(!token.active);
    assert_eq!(token.scope(), "");
}

#[tokio::test]
async fn rejected_client_credentials_surface_as_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/introspection"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let introspector =
        HttpIntrospector::new(settings(format!("{}/introspection", server.uri()))).unwrap();
    let err = introspector.introspect("opaque", None).await.unwrap_err();

    assert!(matches!(
        err,
        IntrospectionError::Status(status) if status == reqwest::StatusCode::UNAUTHORIZED
    ));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/introspection"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let introspector =
        HttpIntrospector::new(settings(format!("{}/introspection", server.uri()))).unwrap();
    let err = introspector.introspect("opaque", None).await.unwrap_err();

    assert!(matches!(err, IntrospectionError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let endpoint = format!("http://127.0.0.1:{}/introspection", port);

    let introspector = HttpIntrospector::new(settings(endpoint)).unwrap();
    let err = introspector.introspect("opaque", None).await.unwrap_err();

    assert!(matches!(err, IntrospectionError::Transport(_)));
}
