//! Cohort queries

use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Active cohort with its active enrollment count
#[derive(Debug, Clone)]
pub struct ActiveCohort {
    pub guid: Uuid,
    pub name: String,
    pub active_enrollments: i64,
}

/// Active cohorts for a partner that have at least one active enrollment
pub async fn active_cohorts_with_enrollments(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<Vec<ActiveCohort>> {
    let rows = sqlx::query(
        r#"
        SELECT c.guid, c.name, COUNT(e.guid) AS active_enrollments
        FROM cohorts c
        JOIN enrollments e ON e.cohort_id = c.guid AND e.status = 'active'
        WHERE c.partner_id = ? AND c.status = 'active'
        GROUP BY c.guid, c.name
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut cohorts = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        cohorts.push(ActiveCohort {
            guid: parse_guid(&guid_str)?,
            name: row.get("name"),
            active_enrollments: row.get("active_enrollments"),
        });
    }
    Ok(cohorts)
}
