//! Score queries

use chrono::{DateTime, Utc};
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Score recorded above its declared maximum
#[derive(Debug, Clone)]
pub struct OverrangeScore {
    pub guid: Uuid,
    pub module_name: String,
    pub value: f64,
    pub max_value: f64,
}

/// Score whose assessment date has no attendance record for the enrollment
#[derive(Debug, Clone)]
pub struct UnmatchedScore {
    pub guid: Uuid,
    pub module_name: String,
    pub assessed_on: DateTime<Utc>,
}

/// Scores whose value exceeds the declared maximum (data corruption)
pub async fn overrange_scores(pool: &SqlitePool, partner_id: Uuid) -> Result<Vec<OverrangeScore>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, module_name, value, max_value
        FROM scores
        WHERE partner_id = ? AND value > max_value
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut scores = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        scores.push(OverrangeScore {
            guid: parse_guid(&guid_str)?,
            module_name: row.get("module_name"),
            value: row.get("value"),
            max_value: row.get("max_value"),
        });
    }
    Ok(scores)
}

/// Scores with no attendance record on the assessment date (referential
/// inconsistency - the participant was scored on a day they never attended)
pub async fn scores_without_attendance(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<Vec<UnmatchedScore>> {
    let rows = sqlx::query(
        r#"
        SELECT s.guid, s.module_name, s.assessed_on
        FROM scores s
        WHERE s.partner_id = ?
          AND NOT EXISTS (
            SELECT 1 FROM attendance_records a
            WHERE a.enrollment_id = s.enrollment_id
              AND date(a.session_date) = date(s.assessed_on)
          )
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut scores = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        scores.push(UnmatchedScore {
            guid: parse_guid(&guid_str)?,
            module_name: row.get("module_name"),
            assessed_on: row.get("assessed_on"),
        });
    }
    Ok(scores)
}
