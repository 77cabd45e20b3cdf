//! Profile reads. Only the zkTLS trust label is consumed here.

use sqlx::PgPool;
use uuid::Uuid;

/// Read `profiles.zktls_trust_level` for a user.
///
/// `None` when the profile is missing or the column is null.
pub async fn trust_level(pool: &PgPool, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
    let level: Option<Option<String>> =
        sqlx::query_scalar("SELECT zktls_trust_level FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(level.flatten())
}
