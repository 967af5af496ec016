//! Enrollment queries

use chrono::{DateTime, Utc};
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Active enrollment with its most recent attendance session date, if any
#[derive(Debug, Clone)]
pub struct EnrollmentAttendance {
    pub guid: Uuid,
    pub last_session: Option<DateTime<Utc>>,
}

/// Active enrollment whose cohort is no longer active
#[derive(Debug, Clone)]
pub struct StaleActiveEnrollment {
    pub guid: Uuid,
    pub cohort_name: String,
    pub cohort_status: String,
}

/// All active enrollments for a partner with their latest attendance date
pub async fn active_enrollment_attendance(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<Vec<EnrollmentAttendance>> {
    let rows = sqlx::query(
        r#"
        SELECT e.guid, MAX(a.session_date) AS last_session
        FROM enrollments e
        LEFT JOIN attendance_records a ON a.enrollment_id = e.guid
        WHERE e.partner_id = ? AND e.status = 'active'
        GROUP BY e.guid
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut enrollments = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        enrollments.push(EnrollmentAttendance {
            guid: parse_guid(&guid_str)?,
            last_session: row.get("last_session"),
        });
    }
    Ok(enrollments)
}

/// Enrollments still marked active while their cohort is not
pub async fn active_enrollments_in_inactive_cohorts(
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<Vec<StaleActiveEnrollment>> {
    let rows = sqlx::query(
        r#"
        SELECT e.guid, c.name AS cohort_name, c.status AS cohort_status
        FROM enrollments e
        JOIN cohorts c ON e.cohort_id = c.guid
        WHERE e.partner_id = ? AND e.status = 'active' AND c.status != 'active'
        "#,
    )
    .bind(partner_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut enrollments = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        enrollments.push(StaleActiveEnrollment {
            guid: parse_guid(&guid_str)?,
            cohort_name: row.get("cohort_name"),
            cohort_status: row.get("cohort_status"),
        });
    }
    Ok(enrollments)
}
