//! Social account lookups against the `social_accounts` table.

use sqlx::PgPool;
use uuid::Uuid;

use super::repository::SocialAccount;

/// Fetch a social account by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SocialAccount>, sqlx::Error> {
    let row = sqlx::query_as::<_, SocialAccountRow>(
        "SELECT id, user_id, platform, username FROM social_accounts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(SocialAccountRow::into_record))
}

#[derive(sqlx::FromRow)]
struct SocialAccountRow {
    id: Uuid,
    user_id: Uuid,
    platform: String,
    username: Option<String>,
}

impl SocialAccountRow {
    fn into_record(self) -> SocialAccount {
        SocialAccount {
            id: self.id,
            user_id: self.user_id,
            platform: self.platform,
            username: self.username,
        }
    }
}
