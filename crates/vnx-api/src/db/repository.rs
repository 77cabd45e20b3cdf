//! Repository seam between the verification handlers and storage.
//!
//! [`PgRepository`] delegates to the per-table functions in this module's
//! siblings. [`super::memory::InMemoryRepository`] backs development runs
//! without `DATABASE_URL` and the router tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{profiles, social_accounts, verifications};

/// Storage failures.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// A linked social media account. Read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: String,
    pub username: Option<String>,
}

/// Columns of a `zktls_verifications` row supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVerification {
    pub social_account_id: Uuid,
    pub user_id: Uuid,
    pub proof_id: String,
    pub proof_data: Value,
    pub provider_id: String,
    pub video_id: Option<String>,
    pub follower_count: Option<i64>,
    pub demographics: Value,
    pub engagement_rate: Option<f64>,
    pub avg_views: Option<f64>,
    pub video_metrics: Option<Value>,
    pub public_data: Option<Value>,
    pub verified_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}

/// A stored verification, as returned by the status lookup.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VerificationRecord {
    pub id: Uuid,
    pub social_account_id: Uuid,
    pub proof_id: String,
    pub provider_id: String,
    pub video_id: Option<String>,
    pub follower_count: Option<i64>,
    #[schema(value_type = Object)]
    pub demographics: Value,
    pub engagement_rate: Option<f64>,
    pub avg_views: Option<f64>,
    #[schema(value_type = Option<Object>)]
    pub video_metrics: Option<Value>,
    pub verified_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}

impl VerificationRecord {
    /// Build the stored view of a freshly inserted row.
    pub fn from_new(id: Uuid, new: &NewVerification) -> Self {
        Self {
            id,
            social_account_id: new.social_account_id,
            proof_id: new.proof_id.clone(),
            provider_id: new.provider_id.clone(),
            video_id: new.video_id.clone(),
            follower_count: new.follower_count,
            demographics: new.demographics.clone(),
            engagement_rate: new.engagement_rate,
            avg_views: new.avg_views,
            video_metrics: new.video_metrics.clone(),
            verified_at: new.verified_at,
            expires_at: new.expires_at,
            is_valid: new.is_valid,
        }
    }
}

/// Storage operations used by the verification routes.
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    async fn find_social_account(&self, id: Uuid) -> Result<Option<SocialAccount>, RepositoryError>;

    /// Insert one verification row and return its id.
    async fn insert_verification(&self, record: &NewVerification) -> Result<Uuid, RepositoryError>;

    /// `profiles.zktls_trust_level` for a user, if set.
    async fn trust_level(&self, user_id: Uuid) -> Result<Option<String>, RepositoryError>;

    /// Most recent verification for a social account by `verified_at`.
    async fn latest_verification(
        &self,
        social_account_id: Uuid,
    ) -> Result<Option<VerificationRecord>, RepositoryError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Postgres-backed repository.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationRepository for PgRepository {
    async fn find_social_account(&self, id: Uuid) -> Result<Option<SocialAccount>, RepositoryError> {
        Ok(social_accounts::get_by_id(&self.pool, id).await?)
    }

    async fn insert_verification(&self, record: &NewVerification) -> Result<Uuid, RepositoryError> {
        Ok(verifications::insert(&self.pool, record).await?)
    }

    async fn trust_level(&self, user_id: Uuid) -> Result<Option<String>, RepositoryError> {
        Ok(profiles::trust_level(&self.pool, user_id).await?)
    }

    async fn latest_verification(
        &self,
        social_account_id: Uuid,
    ) -> Result<Option<VerificationRecord>, RepositoryError> {
        Ok(verifications::latest_for_account(&self.pool, social_account_id).await?)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
