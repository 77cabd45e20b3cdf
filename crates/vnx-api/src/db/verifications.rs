//! Verification record persistence.
//!
//! All functions take a `&PgPool` and operate on the `zktls_verifications`
//! table. Rows are append-only: a resubmitted proof gets a new row.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::repository::{NewVerification, VerificationRecord};

/// Insert a verification row and return the generated id.
pub async fn insert(pool: &PgPool, record: &NewVerification) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO zktls_verifications (social_account_id, user_id, proof_id, proof_data,
         provider_id, video_id, follower_count, demographics, engagement_rate, avg_views,
         video_metrics, public_data, verified_at, expires_at, is_valid)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING id",
    )
    .bind(record.social_account_id)
    .bind(record.user_id)
    .bind(&record.proof_id)
    .bind(&record.proof_data)
    .bind(&record.provider_id)
    .bind(&record.video_id)
    .bind(record.follower_count)
    .bind(&record.demographics)
    .bind(record.engagement_rate)
    .bind(record.avg_views)
    .bind(&record.video_metrics)
    .bind(&record.public_data)
    .bind(record.verified_at)
    .bind(record.expires_at)
    .bind(record.is_valid)
    .fetch_one(pool)
    .await
}

/// Fetch the most recent verification for a social account.
pub async fn latest_for_account(
    pool: &PgPool,
    social_account_id: Uuid,
) -> Result<Option<VerificationRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, VerificationRow>(
        "SELECT id, social_account_id, proof_id, provider_id, video_id, follower_count,
         demographics, engagement_rate, avg_views, video_metrics, verified_at, expires_at, is_valid
         FROM zktls_verifications WHERE social_account_id = $1
         ORDER BY verified_at DESC LIMIT 1",
    )
    .bind(social_account_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(VerificationRow::into_record))
}

#[derive(sqlx::FromRow)]
struct VerificationRow {
    id: Uuid,
    social_account_id: Uuid,
    proof_id: String,
    provider_id: String,
    video_id: Option<String>,
    follower_count: Option<i64>,
    demographics: Value,
    engagement_rate: Option<f64>,
    avg_views: Option<f64>,
    video_metrics: Option<Value>,
    verified_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    is_valid: bool,
}

impl VerificationRow {
    fn into_record(self) -> VerificationRecord {
        VerificationRecord {
            id: self.id,
            social_account_id: self.social_account_id,
            proof_id: self.proof_id,
            provider_id: self.provider_id,
            video_id: self.video_id,
            follower_count: self.follower_count,
            demographics: self.demographics,
            engagement_rate: self.engagement_rate,
            avg_views: self.avg_views,
            video_metrics: self.video_metrics,
            verified_at: self.verified_at,
            expires_at: self.expires_at,
            is_valid: self.is_valid,
        }
    }
}
