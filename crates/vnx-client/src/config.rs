//! Client configuration.
//!
//! Both clients are configured from environment variables. Secrets are held
//! in `Zeroizing` buffers and redacted from `Debug` output.

use url::Url;
use zeroize::Zeroizing;

/// Attestation application id used when `RECLAIM_APP_ID` is unset.
pub const DEFAULT_APP_ID: &str = "0x680b1C60dbd34ffaBfAF0e030615965582abc3d8";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Hosted auth service connection.
#[derive(Clone)]
pub struct HostedAuthConfig {
    /// Project base URL (`SUPABASE_URL`).
    pub base_url: Url,
    /// Public API key sent as the `apikey` header (`SUPABASE_ANON_KEY`).
    pub anon_key: Zeroizing<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for HostedAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedAuthConfig")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HostedAuthConfig {
    /// Load from the environment.
    ///
    /// Variables:
    /// - `SUPABASE_URL` (required)
    /// - `SUPABASE_ANON_KEY` (required)
    /// - `VNX_HTTP_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: required_url("SUPABASE_URL")?,
            anon_key: Zeroizing::new(required("SUPABASE_ANON_KEY")?),
            timeout_secs: timeout_from_env(),
        })
    }
}

/// Proof verifier connection.
#[derive(Clone)]
pub struct VerifierConfig {
    /// Verifier base URL (`RECLAIM_VERIFIER_URL`).
    pub base_url: Url,
    /// Attestation application id (`RECLAIM_APP_ID`).
    pub app_id: String,
    /// Application secret, sent as a bearer token (`RECLAIM_APP_SECRET`).
    pub app_secret: Zeroizing<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl VerifierConfig {
    /// Load from the environment.
    ///
    /// Variables:
    /// - `RECLAIM_VERIFIER_URL` (required)
    /// - `RECLAIM_APP_SECRET` (required)
    /// - `RECLAIM_APP_ID` (default: [`DEFAULT_APP_ID`])
    /// - `VNX_HTTP_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: required_url("RECLAIM_VERIFIER_URL")?,
            app_id: std::env::var("RECLAIM_APP_ID")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            app_secret: Zeroizing::new(required("RECLAIM_APP_SECRET")?),
            timeout_secs: timeout_from_env(),
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

fn required_url(var: &'static str) -> Result<Url, ConfigError> {
    let raw = required(var)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn timeout_from_env() -> u64 {
    std::env::var("VNX_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{0} contains characters not allowed in an HTTP header")]
    InvalidHeader(&'static str),
}
