//! # Application State
//!
//! Shared state for the Axum router: configuration plus the three seams
//! the handlers depend on (repository, proof verifier, identity resolver)
//! and the metrics registry. Every seam is a trait object so tests can swap
//! in fakes.

use std::sync::Arc;

use vnx_client::{IdentityResolver, ProofVerifier};

use crate::db::VerificationRepository;
use crate::middleware::metrics::ApiMetrics;

/// Log output format selected by `VNX_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Parse `json` or `pretty`, case-insensitively. Anything else is pretty.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Server configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Mount the metrics middleware and `/metrics`.
    pub metrics_enabled: bool,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_enabled: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `VNX_METRICS_ENABLED` and `VNX_LOG_FORMAT`.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            metrics_enabled: lookup("VNX_METRICS_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.metrics_enabled),
            log_format: lookup("VNX_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }
}

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repository: Arc<dyn VerificationRepository>,
    pub verifier: Arc<dyn ProofVerifier>,
    pub identity: Arc<dyn IdentityResolver>,
    pub metrics: ApiMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repository: Arc<dyn VerificationRepository>,
        verifier: Arc<dyn ProofVerifier>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            config,
            repository,
            verifier,
            identity,
            metrics: ApiMetrics::new(),
        }
    }
}
