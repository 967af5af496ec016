//! Attendance record queries

use chrono::{DateTime, Utc};
use pathways_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Whether any enrollment in the cohort has an attendance record with a
/// session date at or after the cutoff
pub async fn cohort_has_recent_attendance(
    pool: &SqlitePool,
    partner_id: Uuid,
    cohort_id: Uuid,
    cutoff: DateTime<Utc>,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM attendance_records a
        JOIN enrollments e ON a.enrollment_id = e.guid
        WHERE a.partner_id = ?
          AND e.cohort_id = ?
          AND datetime(a.session_date) >= datetime(?)
        "#,
    )
    .bind(partner_id.to_string())
    .bind(cohort_id.to_string())
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
