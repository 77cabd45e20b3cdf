//! Contract tests for `HostedAuthClient` against a mocked auth service.

use vnx_client::{ClientError, HostedAuthClient, HostedAuthConfig, IdentityResolver};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> HostedAuthClient {
    let config = HostedAuthConfig {
        base_url: mock_server.uri().parse().unwrap(),
        anon_key: zeroize::Zeroizing::new("anon-key".into()),
        timeout_secs: 5,
    };
    HostedAuthClient::new(config).unwrap()
}

#[tokio::test]
async fn resolve_sends_apikey_and_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "8d0fd2b3-9ca7-4d9e-a95f-9e13dded323e",
            "aud": "authenticated",
            "email": "creator@example.com",
            "role": "authenticated"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = test_client(&mock_server)
        .resolve("user-token")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, "8d0fd2b3-9ca7-4d9e-a95f-9e13dded323e");
    assert_eq!(user.email.as_deref(), Some("creator@example.com"));
}

#[tokio::test]
async fn rejected_token_resolves_to_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "msg": "invalid JWT"
        })))
        .mount(&mock_server)
        .await;

    let user = test_client(&mock_server).resolve("expired").await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn forbidden_resolves_to_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    assert!(test_client(&mock_server).resolve("t").await.unwrap().is_none());
}

#[tokio::test]
async fn other_client_errors_resolve_to_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer garbage"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": 400,
            "error_code": "bad_jwt",
            "msg": "invalid JWT: unable to parse or verify signature"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer deleted-user"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error_code": "user_not_found"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(client.resolve("garbage").await.unwrap().is_none());
    assert!(client.resolve("deleted-user").await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_an_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    match test_client(&mock_server).resolve("t").await.unwrap_err() {
        ClientError::Api { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_user_is_a_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"aud": "x"})))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).resolve("t").await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialization { .. }));
}

#[tokio::test]
async fn token_with_control_characters_resolves_to_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let user = test_client(&mock_server).resolve("bad\ntoken").await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    let config = HostedAuthConfig {
        base_url: "http://127.0.0.1:1".parse().unwrap(),
        anon_key: zeroize::Zeroizing::new("anon-key".into()),
        timeout_secs: 2,
    };
    let client = HostedAuthClient::new(config).unwrap();
    let err = client.resolve("t").await.unwrap_err();
    assert!(matches!(err, ClientError::Http { .. }));
}
