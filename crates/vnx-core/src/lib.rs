//! # vnx-core: Proof Payload Normalizer
//!
//! Turns a verified zkTLS proof about a creator's TikTok or Instagram
//! analytics into one uniform summary: audience demographics, an engagement
//! rate, average views, and exactly one provider-specific payload.
//!
//! The upstream payloads are loosely typed and drift between releases of the
//! platforms' internal APIs. Every field is read through tolerant probes
//! ([`probe`]) so an unexpected shape degrades to an absent field instead of
//! an error.
//!
//! ## Flow
//!
//! 1. [`proof::select_proof`] picks the sub-proof to read (`proofs[0]` or
//!    the bare proof).
//! 2. [`proof::extract_parameters`] and [`proof::public_data`] unwrap the
//!    claim parameters and the public analytics blob.
//! 3. [`extract::normalize`] dispatches on [`Provider`] to one of five
//!    readers in [`readers`].
//!
//! ## Crate Policy
//!
//! - No I/O. Verification and persistence live in `vnx-api`.
//! - No `.unwrap()` outside tests. Malformed sub-fields are logged with
//!   `tracing::warn!` and skipped.

pub mod demographics;
pub mod engagement;
pub mod error;
pub mod extract;
pub mod probe;
pub mod proof;
pub mod provider;
pub mod readers;

pub use demographics::Demographics;
pub use engagement::engagement_rate;
pub use error::ExtractError;
pub use extract::{
    content_id, normalize, AccountAnalytics, ExtractedData, InstagramAccount, PostMetrics,
    ProviderPayload, TikTokUserProfile, VideoMetrics,
};
pub use proof::{extract_parameters, public_data, select_proof, Params};
pub use provider::{Platform, Provider};
