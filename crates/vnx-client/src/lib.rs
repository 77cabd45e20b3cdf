//! # vnx-client: External Service Clients
//!
//! Typed access to the two services the verification flow depends on:
//!
//! - **Hosted auth** ([`auth::HostedAuthClient`]): resolves a caller's
//!   bearer token to a user id via `GET {SUPABASE_URL}/auth/v1/user`.
//! - **Proof verifier** ([`verifier::HttpProofVerifier`]): asks the
//!   attestation network whether a proof's signatures hold. The check is
//!   opaque; this crate never inspects signatures itself.
//!
//! Each client sits behind an async trait ([`IdentityResolver`],
//! [`ProofVerifier`]) so the HTTP service can be exercised with fakes.
//!
//! There are no retries: a failed call surfaces to the caller, who
//! resubmits.

pub mod auth;
pub mod config;
pub mod error;
pub mod verifier;

pub use auth::{AuthUser, HostedAuthClient, IdentityResolver};
pub use config::{ConfigError, HostedAuthConfig, VerifierConfig};
pub use error::ClientError;
pub use verifier::{HttpProofVerifier, ProofVerifier};

use std::time::Duration;

/// Build the shared reqwest client with the configured timeout.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ClientError::Http {
            endpoint: "client_init".into(),
            source: e,
        })
}

/// Join a relative path onto a base URL, tolerating a trailing slash on the
/// base.
pub(crate) fn join(base: &url::Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
