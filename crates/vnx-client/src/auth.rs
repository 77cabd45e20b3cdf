//! Hosted auth service client.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/auth/v1/user` | Resolve the bearer token's user |

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::config::{ConfigError, HostedAuthConfig};
use crate::error::ClientError;

const USER_PATH: &str = "auth/v1/user";

/// The authenticated caller, as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Resolves a bearer token to a user.
///
/// `Ok(None)` means the token was understood and rejected (expired,
/// revoked, malformed). `Err` means the auth service could not be asked.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, bearer_token: &str) -> Result<Option<AuthUser>, ClientError>;
}

/// Client for the hosted auth service.
#[derive(Clone)]
pub struct HostedAuthClient {
    http: reqwest::Client,
    user_url: String,
    anon_key: Zeroizing<String>,
}

impl std::fmt::Debug for HostedAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedAuthClient")
            .field("user_url", &self.user_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl HostedAuthClient {
    pub fn new(config: HostedAuthConfig) -> Result<Self, ClientError> {
        HeaderValue::from_str(config.anon_key.as_str())
            .map_err(|_| ConfigError::InvalidHeader("SUPABASE_ANON_KEY"))?;
        Ok(Self {
            http: crate::http_client(config.timeout_secs)?,
            user_url: crate::join(&config.base_url, USER_PATH),
            anon_key: config.anon_key,
        })
    }
}

#[async_trait]
impl IdentityResolver for HostedAuthClient {
    async fn resolve(&self, bearer_token: &str) -> Result<Option<AuthUser>, ClientError> {
        let endpoint = "GET /auth/v1/user";

        // A token that cannot even be sent as a header identifies nobody.
        let Ok(authorization) = HeaderValue::from_str(&format!("Bearer {bearer_token}")) else {
            tracing::debug!("bearer token is not a valid header value");
            return Ok(None);
        };

        let resp = self
            .http
            .get(&self.user_url)
            .header("apikey", self.anon_key.as_str())
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status();
        // Any 4xx means the token identifies nobody.
        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), "auth service rejected bearer token");
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body,
            });
        }

        let user: AuthUser = resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        Ok(Some(user))
    }
}
