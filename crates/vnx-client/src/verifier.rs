//! Proof verifier client.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/verify` | Check a proof's attestation signatures |
//!
//! The request carries the application id and the proof exactly as the
//! client submitted it. The verifier answers `{"valid": bool}` (older
//! deployments spell it `isValid`).

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::config::{ConfigError, VerifierConfig};
use crate::error::ClientError;

const VERIFY_PATH: &str = "verify";

/// Decides whether a proof is authentic.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    async fn verify(&self, proof: &Value) -> Result<bool, ClientError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    app_id: &'a str,
    proof: &'a Value,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(alias = "isValid")]
    valid: bool,
}

/// HTTP client for the attestation network's verifier.
#[derive(Clone)]
pub struct HttpProofVerifier {
    http: reqwest::Client,
    verify_url: String,
    app_id: String,
    authorization: Zeroizing<String>,
}

impl std::fmt::Debug for HttpProofVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProofVerifier")
            .field("verify_url", &self.verify_url)
            .field("app_id", &self.app_id)
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}

impl HttpProofVerifier {
    pub fn new(config: VerifierConfig) -> Result<Self, ClientError> {
        let authorization = Zeroizing::new(format!("Bearer {}", config.app_secret.as_str()));
        HeaderValue::from_str(&authorization)
            .map_err(|_| ConfigError::InvalidHeader("RECLAIM_APP_SECRET"))?;
        Ok(Self {
            http: crate::http_client(config.timeout_secs)?,
            verify_url: crate::join(&config.base_url, VERIFY_PATH),
            app_id: config.app_id,
            authorization,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

#[async_trait]
impl ProofVerifier for HttpProofVerifier {
    async fn verify(&self, proof: &Value) -> Result<bool, ClientError> {
        let endpoint = "POST /verify";
        let body = VerifyRequest {
            app_id: &self.app_id,
            proof,
        };

        let resp = self
            .http
            .post(&self.verify_url)
            .header(AUTHORIZATION, self.authorization.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let verdict: VerifyResponse =
            resp.json().await.map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;
        tracing::debug!(valid = verdict.valid, "proof verifier responded");
        Ok(verdict.valid)
    }
}
