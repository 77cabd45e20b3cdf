//! # Proof Verification
//!
//! `POST /v1/zktls/verify`: check a zkTLS analytics proof with the external
//! verifier, normalize it, and append an audit record that expires after
//! [`VERIFICATION_TTL_DAYS`].
//!
//! Order of checks: body, provider, account existence, ownership, proof
//! shape, verifier. Nothing from a proof is parsed, logged or stored until
//! the verifier has accepted it.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use vnx_core::{content_id, extract_parameters, normalize, public_data, select_proof, ExtractedData, Provider};

use crate::auth::AuthenticatedUser;
use crate::db::{NewVerification, SocialAccount};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::middleware::metrics::VerificationOutcome;
use crate::state::AppState;

/// Lifetime of a stored verification.
pub const VERIFICATION_TTL_DAYS: i64 = 30;

/// Trust label reported when the caller's profile has none.
pub const DEFAULT_TRUST_LEVEL: &str = "verified";

/// Request body for `POST /v1/zktls/verify`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyProofRequest {
    /// Social account the proof is about. Must belong to the caller.
    #[serde(default)]
    pub social_account_id: String,
    /// The proof bundle, bare or wrapped as `{"proofs": [..]}`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub proof: Value,
    /// Provider id; the TikTok account provider when omitted.
    #[serde(default)]
    pub provider_id: Option<String>,
    /// Video or post id for per-content providers.
    #[serde(default)]
    pub video_id: Option<String>,
}

impl Validate for VerifyProofRequest {
    fn validate(&self) -> Result<(), String> {
        if self.social_account_id.trim().is_empty() || self.proof.is_null() {
            return Err("Missing required fields: social_account_id, proof".into());
        }
        Ok(())
    }
}

/// Normalized proof summary plus the identity fields found in the proof.
#[derive(Debug, Serialize)]
pub struct ExtractedSummary {
    #[serde(flatten)]
    pub data: ExtractedData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Successful verification.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyProofResponse {
    pub success: bool,
    pub verification_id: Uuid,
    pub provider_type: String,
    /// `demographics`, `engagement_rate`, `avg_views`, optional `username`
    /// and `user_id`, and one provider payload key.
    #[schema(value_type = Object)]
    pub extracted_data: ExtractedSummary,
    pub expires_at: DateTime<Utc>,
    pub trust_level: String,
}

/// Build the verify router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/zktls/verify", post(verify_proof))
}

/// Audit id for a proof submission: `reclaim_<millis>_<random>`.
fn proof_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("reclaim_{}_{}", now.timestamp_millis(), &random[..8])
}

/// Parse the account id and load the account, enforcing ownership.
pub(crate) async fn owned_account(
    state: &AppState,
    caller: &AuthenticatedUser,
    social_account_id: &str,
) -> Result<SocialAccount, AppError> {
    let not_found = || AppError::NotFound("Social account not found".into());

    let id = Uuid::parse_str(social_account_id.trim()).map_err(|_| not_found())?;
    let account = state
        .repository
        .find_social_account(id)
        .await?
        .ok_or_else(not_found)?;

    if caller.user_uuid() != Some(account.user_id) {
        tracing::warn!(
            social_account_id = %account.id,
            caller = %caller.id,
            "caller does not own social account"
        );
        return Err(AppError::Forbidden("You do not own this social account".into()));
    }

    Ok(account)
}

/// POST /v1/zktls/verify: Verify a proof and store the normalized result.
#[utoipa::path(
    post,
    path = "/v1/zktls/verify",
    request_body = VerifyProofRequest,
    responses(
        (status = 200, description = "Proof verified and stored", body = VerifyProofResponse),
        (status = 400, description = "Missing fields, malformed or invalid proof", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorBody),
        (status = 403, description = "Social account belongs to another user", body = crate::error::ErrorBody),
        (status = 404, description = "Social account not found", body = crate::error::ErrorBody),
        (status = 500, description = "Verification could not be stored", body = crate::error::ErrorBody),
        (status = 502, description = "Auth service unavailable", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "zktls"
)]
async fn verify_proof(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    body: Result<Json<VerifyProofRequest>, JsonRejection>,
) -> Result<Json<VerifyProofResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let requested_provider = req.provider_id.as_deref().filter(|id| !id.is_empty());
    let provider = Provider::from_optional_id(requested_provider);
    let provider_type = provider.provider_type();

    let account = owned_account(&state, &caller, &req.social_account_id).await?;

    tracing::info!(
        provider = %provider,
        social_account_id = %account.id,
        platform = %account.platform,
        "verifying zkTLS proof"
    );

    let selected = select_proof(&req.proof).map_err(|e| {
        state
            .metrics
            .record_verification(provider_type, VerificationOutcome::Malformed);
        AppError::ExtractionFailed(e.to_string())
    })?;

    let valid = match state.verifier.verify(&Value::Object(selected.clone())).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "proof verifier call failed; treating proof as invalid");
            false
        }
    };
    if !valid {
        state
            .metrics
            .record_verification(provider_type, VerificationOutcome::Invalid);
        tracing::info!(social_account_id = %account.id, "proof rejected by verifier");
        return Err(AppError::InvalidProof);
    }

    let params = extract_parameters(selected);
    let public = public_data(selected);
    let data = normalize(provider, public.as_ref(), &params);
    let video_id = content_id(provider, req.video_id.as_deref(), &params);

    let now = Utc::now();
    let expires_at = now + Duration::days(VERIFICATION_TTL_DAYS);
    let demographics = serde_json::to_value(&data.demographics)
        .map_err(|e| AppError::Internal(format!("demographics serialization: {e}")))?;

    let record = NewVerification {
        social_account_id: account.id,
        user_id: account.user_id,
        proof_id: proof_id(now),
        proof_data: req.proof.clone(),
        provider_id: requested_provider.unwrap_or(provider.id()).to_string(),
        video_id,
        follower_count: data.follower_count(),
        demographics,
        engagement_rate: data.engagement_rate,
        avg_views: data.avg_views,
        video_metrics: data.stored_metrics(),
        public_data: selected.get("publicData").cloned(),
        verified_at: now,
        expires_at,
        is_valid: true,
    };

    let verification_id = state
        .repository
        .insert_verification(&record)
        .await
        .map_err(|e| {
            state
                .metrics
                .record_verification(provider_type, VerificationOutcome::Error);
            AppError::Persistence(e.to_string())
        })?;

    let trust_level = match state.repository.trust_level(account.user_id).await {
        Ok(Some(level)) => level,
        Ok(None) => DEFAULT_TRUST_LEVEL.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read trust level; using default");
            DEFAULT_TRUST_LEVEL.to_string()
        }
    };

    state
        .metrics
        .record_verification(provider_type, VerificationOutcome::Verified);
    tracing::info!(
        %verification_id,
        provider_type,
        proof_id = %record.proof_id,
        "proof verified and stored"
    );

    let username = data.username(&params);
    let user_id = data.user_id(&params);

    Ok(Json(VerifyProofResponse {
        success: true,
        verification_id,
        provider_type: provider_type.to_string(),
        extracted_data: ExtractedSummary {
            data,
            username,
            user_id,
        },
        expires_at,
        trust_level,
    }))
}
