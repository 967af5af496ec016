//! Attendance-gap detector
//!
//! Runs per active cohort. A cohort with at least one active enrollment and
//! no attendance record across any of its enrollments within the configured
//! window points at facilitator inactivity. One candidate per cohort (not
//! per participant) keeps a quiet cohort from flooding the alert list.

use crate::config::MonitorConfig;
use crate::db;
use crate::types::{AlertCandidate, AlertType, EntityKind, Severity};
use chrono::{DateTime, Duration, Utc};
use pathways_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Find active cohorts with no recent attendance across any enrollment
pub async fn scan(
    pool: &SqlitePool,
    partner_id: Uuid,
    now: DateTime<Utc>,
    config: &MonitorConfig,
) -> Result<Vec<AlertCandidate>> {
    let cutoff = now - Duration::hours(config.attendance_gap_hours);
    let cohorts = db::cohorts::active_cohorts_with_enrollments(pool, partner_id).await?;

    let mut candidates = Vec::new();
    for cohort in cohorts {
        if db::attendance::cohort_has_recent_attendance(pool, partner_id, cohort.guid, cutoff)
            .await?
        {
            continue;
        }

        candidates.push(AlertCandidate {
            alert_type: AlertType::AttendanceCheck,
            severity: Severity::Critical,
            title: format!("No recent attendance in cohort '{}'", cohort.name),
            description: format!(
                "None of the {} active enrollments in cohort '{}' have an attendance record in the last {} hours.",
                cohort.active_enrollments, cohort.name, config.attendance_gap_hours
            ),
            issue_count: cohort.active_enrollments,
            call_to_action: Some(format!("/cohorts/{}/attendance", cohort.guid)),
            related_entity_type: EntityKind::Cohort,
            related_entity_id: cohort.guid,
        });
    }

    Ok(candidates)
}
