//! `GET /v1/social-accounts/:id/verification`: the latest stored
//! verification for an account the caller owns, with its freshness.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::VerificationRecord;
use crate::error::AppError;
use crate::routes::verify::owned_account;
use crate::state::AppState;

/// Days before expiry at which a verification counts as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl VerificationStatus {
    pub fn at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now >= expires_at {
            Self::Expired
        } else if expires_at - now <= Duration::days(EXPIRING_SOON_DAYS) {
            Self::ExpiringSoon
        } else {
            Self::Valid
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationStatusResponse {
    pub social_account_id: Uuid,
    pub platform: String,
    pub status: VerificationStatus,
    /// Whole days until expiry, zero once expired.
    pub days_remaining: i64,
    pub verification: VerificationRecord,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/v1/social-accounts/:id/verification",
        get(latest_verification),
    )
}

/// GET /v1/social-accounts/:id/verification: Latest verification for an owned account.
#[utoipa::path(
    get,
    path = "/v1/social-accounts/{id}/verification",
    params(("id" = Uuid, Path, description = "Social account ID")),
    responses(
        (status = 200, description = "Latest verification", body = VerificationStatusResponse),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorBody),
        (status = 403, description = "Social account belongs to another user", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown account or no verification yet", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
async fn latest_verification(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<VerificationStatusResponse>, AppError> {
    let account = owned_account(&state, &caller, &id).await?;

    let verification = state
        .repository
        .latest_verification(account.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No verification found for this social account".into()))?;

    let now = Utc::now();
    let status = VerificationStatus::at(verification.expires_at, now);
    let days_remaining = (verification.expires_at - now).num_days().max(0);

    Ok(Json(VerificationStatusResponse {
        social_account_id: account.id,
        platform: account.platform,
        status,
        days_remaining,
        verification,
    }))
}
