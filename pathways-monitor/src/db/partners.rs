//! Partner queries

use pathways_common::db::models::Partner;
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};

/// List all active partners (the scheduler's tenant enumeration)
pub async fn list_active_partners(pool: &SqlitePool) -> Result<Vec<Partner>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, name, status
        FROM partners
        WHERE status = 'active'
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut partners = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        partners.push(Partner {
            guid: parse_guid(&guid_str)?,
            name: row.get("name"),
            status: row.get("status"),
        });
    }
    Ok(partners)
}
