//! # Proof Unwrapping
//!
//! A submitted proof arrives either as a bundle (`{"proofs": [..]}`) or as a
//! single proof object. Only the first sub-proof of a bundle is read. The
//! claim parameters live in one of three places depending on the SDK version
//! that produced the proof:
//!
//! - `claimData.context.extractedParameters` (current SDKs; `context` is
//!   usually a JSON string),
//! - `claimData.parameters` (legacy; also often a JSON string),
//! - `extractedParameterValues` (newest format, merged over the others).

use serde_json::{Map, Value};

use crate::error::ExtractError;

/// Claim parameters keyed by name.
pub type Params = Map<String, Value>;

/// Pick the proof to read from a submission.
///
/// `proofs[0]` wins when present. Otherwise the submission itself is used,
/// which covers both bare proofs and bundles with an empty `proofs` array.
/// The chosen proof must carry a `claimData` object.
pub fn select_proof(proof: &Value) -> Result<&Map<String, Value>, ExtractError> {
    let root = proof.as_object().ok_or(ExtractError::NotAnObject)?;

    let selected = match root.get("proofs").and_then(Value::as_array) {
        Some(proofs) if !proofs.is_empty() => proofs[0]
            .as_object()
            .ok_or(ExtractError::MissingClaimData)?,
        _ => root,
    };

    match selected.get("claimData") {
        Some(Value::Object(_)) => Ok(selected),
        _ => Err(ExtractError::MissingClaimData),
    }
}

/// Collect the claim parameters of a selected proof.
///
/// Embedded JSON that fails to decode is logged and treated as absent.
pub fn extract_parameters(selected: &Map<String, Value>) -> Params {
    let claim = selected.get("claimData").and_then(Value::as_object);

    let mut params = claim
        .and_then(|c| c.get("context"))
        .and_then(|ctx| decode_object(ctx, "claimData.context"))
        .and_then(|ctx| match ctx.get("extractedParameters") {
            Some(Value::Object(p)) => Some(p.clone()),
            _ => None,
        })
        .unwrap_or_default();

    if params.is_empty() {
        params = claim
            .and_then(|c| c.get("parameters"))
            .and_then(|p| decode_object(p, "claimData.parameters"))
            .unwrap_or_default();
    }

    if let Some(values) = selected
        .get("extractedParameterValues")
        .and_then(|v| decode_object(v, "extractedParameterValues"))
    {
        params.extend(values);
    }

    params
}

/// The selected proof's public analytics blob, if any.
pub fn public_data(selected: &Map<String, Value>) -> Option<Map<String, Value>> {
    selected
        .get("publicData")
        .and_then(|v| decode_object(v, "publicData"))
}

/// Read a value as a JSON object, decoding it first when it is a string.
fn decode_object(value: &Value, field: &'static str) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                tracing::warn!(field, "embedded JSON is not an object, ignoring");
                None
            }
            Err(e) => {
                tracing::warn!(field, error = %e, "failed to decode embedded JSON, ignoring");
                None
            }
        },
        _ => None,
    }
}
