//! # Database Persistence Layer
//!
//! Postgres persistence for verification records via SQLx.
//!
//! ## Architecture
//!
//! The database is **optional**. When `DATABASE_URL` is set, the API reads
//! social accounts and profiles and appends verification rows in Postgres.
//! When absent, the API runs against [`memory::InMemoryRepository`], which
//! is suitable for development and testing only.
//!
//! Handlers never touch the pool directly: they go through the
//! [`VerificationRepository`] trait.

pub mod memory;
pub mod profiles;
pub mod repository;
pub mod social_accounts;
pub mod verifications;

pub use memory::InMemoryRepository;
pub use repository::{
    NewVerification, PgRepository, RepositoryError, SocialAccount, VerificationRecord,
    VerificationRepository,
};

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set, running with the in-memory repository. \
                 Verifications will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
