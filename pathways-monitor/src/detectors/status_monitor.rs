//! New-survey status monitor
//!
//! Surfaces operational events rather than problems: a survey created within
//! the last run window that is still in draft gets an informational nudge so
//! the partner's monitor publishes it.

use crate::config::MonitorConfig;
use crate::db;
use crate::types::{AlertCandidate, AlertType, EntityKind, Severity};
use chrono::{DateTime, Duration, Utc};
use pathways_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Find recently created surveys still in draft state
pub async fn scan(
    pool: &SqlitePool,
    partner_id: Uuid,
    now: DateTime<Utc>,
    config: &MonitorConfig,
) -> Result<Vec<AlertCandidate>> {
    let cutoff = now - Duration::seconds(config.survey_draft_window_secs);
    let surveys = db::surveys::recent_draft_surveys(pool, partner_id, cutoff).await?;

    let candidates = surveys
        .into_iter()
        .map(|survey| AlertCandidate {
            alert_type: AlertType::StatusMonitor,
            severity: Severity::Info,
            title: format!("New survey '{}' is not published yet", survey.title),
            description: format!(
                "Survey '{}' was created at {} and is still in draft. Publish it to start collecting responses.",
                survey.title,
                survey.created_at.format("%Y-%m-%d %H:%M UTC")
            ),
            issue_count: 1,
            call_to_action: Some(format!("/surveys/{}/publish", survey.guid)),
            related_entity_type: EntityKind::Survey,
            related_entity_id: survey.guid,
        })
        .collect();

    Ok(candidates)
}
