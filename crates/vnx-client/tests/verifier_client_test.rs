//! Contract tests for `HttpProofVerifier` against a mocked verifier.

use serde_json::json;
use vnx_client::config::DEFAULT_APP_ID;
use vnx_client::{ClientError, HttpProofVerifier, ProofVerifier, VerifierConfig};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_verifier(mock_server: &MockServer) -> HttpProofVerifier {
    let config = VerifierConfig {
        base_url: mock_server.uri().parse().unwrap(),
        app_id: DEFAULT_APP_ID.into(),
        app_secret: zeroize::Zeroizing::new("app-secret".into()),
        timeout_secs: 5,
    };
    HttpProofVerifier::new(config).unwrap()
}

fn sample_proof() -> serde_json::Value {
    json!({
        "claimData": {"provider": "http", "parameters": "{}", "context": "{}"},
        "signatures": ["0xabc"],
        "witnesses": [{"id": "0xw", "url": "wss://witness"}]
    })
}

#[tokio::test]
async fn verify_posts_app_id_and_proof() {
    let mock_server = MockServer::start().await;
    let proof = sample_proof();

    Mock::given(method("POST"))
        .and(path("/verify"))
        .and(header("authorization", "Bearer app-secret"))
        .and(body_json(json!({"appId": DEFAULT_APP_ID, "proof": proof.clone()})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(test_verifier(&mock_server).verify(&proof).await.unwrap());
}

#[tokio::test]
async fn verify_reads_legacy_field_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isValid": false})))
        .mount(&mock_server)
        .await;

    assert!(!test_verifier(&mock_server).verify(&sample_proof()).await.unwrap());
}

#[tokio::test]
async fn verify_non_2xx_is_an_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad proof"))
        .mount(&mock_server)
        .await;

    match test_verifier(&mock_server).verify(&sample_proof()).await.unwrap_err() {
        ClientError::Api { status, .. } => assert_eq!(status, 400),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn verify_missing_verdict_is_a_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    let err = test_verifier(&mock_server)
        .verify(&sample_proof())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Deserialization { .. }));
}

#[test]
fn debug_output_hides_the_secret() {
    let config = VerifierConfig {
        base_url: "https://verifier.example.com".parse().unwrap(),
        app_id: "app".into(),
        app_secret: zeroize::Zeroizing::new("app-secret".into()),
        timeout_secs: 5,
    };
    let verifier = HttpProofVerifier::new(config).unwrap();
    assert_eq!(verifier.app_id(), "app");
    assert!(!format!("{verifier:?}").contains("app-secret"));
}
