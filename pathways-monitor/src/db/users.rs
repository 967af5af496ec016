//! User queries

use pathways_common::db::models::User;
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// The partner's designated monitoring actor (zero or one)
pub async fn find_monitor_user(pool: &SqlitePool, partner_id: Uuid) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT guid, partner_id, display_name, email, role
        FROM users
        WHERE partner_id = ? AND role = 'monitor'
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            let partner_str: String = row.get("partner_id");
            Ok(Some(User {
                guid: parse_guid(&guid_str)?,
                partner_id: parse_guid(&partner_str)?,
                display_name: row.get("display_name"),
                email: row.get("email"),
                role: row.get("role"),
            }))
        }
        None => Ok(None),
    }
}
