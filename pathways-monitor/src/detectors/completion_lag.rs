//! Completion-lag detector
//!
//! Compares each published survey's completion rate against the partner-wide
//! average over all published surveys. A survey lagging the average by more
//! than the configured fraction of that average is flagged; a lag beyond the
//! critical fraction escalates the severity.

use crate::config::MonitorConfig;
use crate::db;
use crate::types::{AlertCandidate, AlertType, EntityKind, Severity};
use chrono::{DateTime, Utc};
use pathways_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Find published surveys whose completion rate lags the partner average
pub async fn scan(
    pool: &SqlitePool,
    partner_id: Uuid,
    _now: DateTime<Utc>,
    config: &MonitorConfig,
) -> Result<Vec<AlertCandidate>> {
    let totals = db::surveys::program_completion_totals(pool, partner_id).await?;
    if totals.total == 0 {
        return Ok(Vec::new());
    }

    let average = totals.submitted as f64 / totals.total as f64;
    // No comparison is meaningful against a zero baseline
    if average <= 0.0 {
        return Ok(Vec::new());
    }

    let surveys = db::surveys::survey_completion_stats(pool, partner_id).await?;

    let mut candidates = Vec::new();
    for survey in surveys {
        let rate = survey.submitted as f64 / survey.total as f64;
        let Some(severity) = classify_lag(average, rate, config) else {
            continue;
        };

        let unsubmitted = survey.total - survey.submitted;
        candidates.push(AlertCandidate {
            alert_type: AlertType::CompletionCheck,
            severity,
            title: format!("Survey '{}' completion is lagging", survey.title),
            description: format!(
                "Survey '{}' is at {:.0}% completion against a program average of {:.0}% ({} responses outstanding).",
                survey.title,
                rate * 100.0,
                average * 100.0,
                unsubmitted
            ),
            issue_count: unsubmitted,
            call_to_action: Some(format!("/surveys/{}", survey.guid)),
            related_entity_type: EntityKind::Survey,
            related_entity_id: survey.guid,
        });
    }

    Ok(candidates)
}

/// Classify a survey's lag against the program average
///
/// Returns None when the survey is within tolerance.
fn classify_lag(average: f64, rate: f64, config: &MonitorConfig) -> Option<Severity> {
    let lag = average - rate;
    if lag <= average * config.completion_lag_ratio {
        return None;
    }
    if lag > average * config.completion_critical_ratio {
        Some(Severity::Critical)
    } else {
        Some(Severity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_tolerance_is_not_flagged() {
        let config = MonitorConfig::default();
        // avg 70%, rate 60%: lag 10 <= threshold 14
        assert_eq!(classify_lag(0.70, 0.60, &config), None);
    }

    #[test]
    fn test_moderate_lag_is_warning() {
        let config = MonitorConfig::default();
        // avg 70%, rate 50%: lag 20 > 14 but not > 28
        assert_eq!(classify_lag(0.70, 0.50, &config), Some(Severity::Warning));
    }

    #[test]
    fn test_deep_lag_is_critical() {
        let config = MonitorConfig::default();
        // avg 70%, rate 30%: lag 40 > 28
        assert_eq!(classify_lag(0.70, 0.30, &config), Some(Severity::Critical));
    }

    #[test]
    fn test_boundary_lag_is_not_flagged() {
        let config = MonitorConfig::default();
        // lag exactly at the threshold stays quiet
        assert_eq!(classify_lag(0.50, 0.40, &config), None);
    }
}
