//! Data-consistency scanner
//!
//! Three independent tenant-scoped checks:
//! 1. active enrollments with missing or stale attendance
//! 2. score anomalies (value over maximum, score without attendance that day)
//! 3. enrollment/cohort state mismatches
//!
//! The scanner emits a flat candidate list and does not deduplicate; the
//! lifecycle manager collapses repeats.

use crate::config::MonitorConfig;
use crate::db;
use crate::types::{AlertCandidate, AlertType, EntityKind, Severity};
use chrono::{DateTime, Duration, Utc};
use pathways_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Run all consistency checks for a partner
pub async fn scan(
    pool: &SqlitePool,
    partner_id: Uuid,
    now: DateTime<Utc>,
    config: &MonitorConfig,
) -> Result<Vec<AlertCandidate>> {
    let mut candidates = Vec::new();
    check_enrollment_attendance(&mut candidates, pool, partner_id, now, config).await?;
    check_score_anomalies(&mut candidates, pool, partner_id).await?;
    check_enrollment_state(&mut candidates, pool, partner_id).await?;
    Ok(candidates)
}

/// Active enrollments with zero attendance records, or none recent
async fn check_enrollment_attendance(
    candidates: &mut Vec<AlertCandidate>,
    pool: &SqlitePool,
    partner_id: Uuid,
    now: DateTime<Utc>,
    config: &MonitorConfig,
) -> Result<()> {
    let stale_cutoff = now - Duration::days(config.attendance_stale_days);
    let enrollments = db::enrollments::active_enrollment_attendance(pool, partner_id).await?;

    for enrollment in enrollments {
        match enrollment.last_session {
            None => candidates.push(AlertCandidate {
                alert_type: AlertType::MissingAttendance,
                severity: Severity::Critical,
                title: "Active enrollment has no attendance records".to_string(),
                description: format!(
                    "Enrollment {} is active but has never had attendance recorded.",
                    enrollment.guid
                ),
                issue_count: 1,
                call_to_action: Some(format!("/enrollments/{}", enrollment.guid)),
                related_entity_type: EntityKind::Enrollment,
                related_entity_id: enrollment.guid,
            }),
            Some(last) if last < stale_cutoff => candidates.push(AlertCandidate {
                alert_type: AlertType::MissingAttendance,
                severity: Severity::Warning,
                title: "Attendance trail has gone stale".to_string(),
                description: format!(
                    "Enrollment {} has had no attendance recorded since {} (threshold: {} days).",
                    enrollment.guid,
                    last.format("%Y-%m-%d"),
                    config.attendance_stale_days
                ),
                issue_count: 1,
                call_to_action: Some(format!("/enrollments/{}", enrollment.guid)),
                related_entity_type: EntityKind::Enrollment,
                related_entity_id: enrollment.guid,
            }),
            Some(_) => {}
        }
    }

    Ok(())
}

/// Scores above their maximum, or recorded on a day with no attendance
async fn check_score_anomalies(
    candidates: &mut Vec<AlertCandidate>,
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<()> {
    for score in db::scores::overrange_scores(pool, partner_id).await? {
        candidates.push(AlertCandidate {
            alert_type: AlertType::ScoreMismatch,
            severity: Severity::Critical,
            title: format!("Score exceeds maximum in '{}'", score.module_name),
            description: format!(
                "Score {} was recorded with value {} against a maximum of {}.",
                score.guid, score.value, score.max_value
            ),
            issue_count: 1,
            call_to_action: Some(format!("/scores/{}", score.guid)),
            related_entity_type: EntityKind::Score,
            related_entity_id: score.guid,
        });
    }

    for score in db::scores::scores_without_attendance(pool, partner_id).await? {
        candidates.push(AlertCandidate {
            alert_type: AlertType::ScoreMismatch,
            severity: Severity::Warning,
            title: format!("Score without attendance in '{}'", score.module_name),
            description: format!(
                "Score {} was assessed on {} but the enrollment has no attendance record for that day.",
                score.guid,
                score.assessed_on.format("%Y-%m-%d")
            ),
            issue_count: 1,
            call_to_action: Some(format!("/scores/{}", score.guid)),
            related_entity_type: EntityKind::Score,
            related_entity_id: score.guid,
        });
    }

    Ok(())
}

/// Participants who fell out of active cohorts, and enrollments left active
/// in cohorts that are not
async fn check_enrollment_state(
    candidates: &mut Vec<AlertCandidate>,
    pool: &SqlitePool,
    partner_id: Uuid,
) -> Result<()> {
    for participant in db::participants::participants_without_active_enrollment(pool, partner_id).await? {
        candidates.push(AlertCandidate {
            alert_type: AlertType::EnrollmentGap,
            severity: Severity::Warning,
            title: format!("'{}' has no active enrollment", participant.display_name),
            description: format!(
                "Participant '{}' has only inactive enrollments while an active cohort they are not enrolled in exists.",
                participant.display_name
            ),
            issue_count: 1,
            call_to_action: Some(format!("/participants/{}", participant.guid)),
            related_entity_type: EntityKind::Participant,
            related_entity_id: participant.guid,
        });
    }

    for enrollment in db::enrollments::active_enrollments_in_inactive_cohorts(pool, partner_id).await? {
        candidates.push(AlertCandidate {
            alert_type: AlertType::EnrollmentGap,
            severity: Severity::Critical,
            title: format!("Active enrollment in {} cohort '{}'", enrollment.cohort_status, enrollment.cohort_name),
            description: format!(
                "Enrollment {} is still active but its cohort '{}' is {}.",
                enrollment.guid, enrollment.cohort_name, enrollment.cohort_status
            ),
            issue_count: 1,
            call_to_action: Some(format!("/enrollments/{}", enrollment.guid)),
            related_entity_type: EntityKind::Enrollment,
            related_entity_id: enrollment.guid,
        });
    }

    Ok(())
}
