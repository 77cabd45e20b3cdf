//! Normalizer error types.

/// Errors that stop extraction outright.
///
/// Malformed sub-fields never surface here: readers log and skip them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The `provider_id` does not match any known provider.
    #[error("unsupported provider: {0}")]
    UnknownProvider(String),

    /// The proof payload is not a JSON object.
    #[error("proof must be a JSON object")]
    NotAnObject,

    /// Neither `proofs[0]` nor the top-level proof carries claim data.
    #[error("no proof with claimData found")]
    MissingClaimData,
}
