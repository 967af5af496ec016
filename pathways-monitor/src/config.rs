//! Monitor configuration
//!
//! Database-first: every period and threshold lives in the settings table so
//! operators can tune a running deployment. Missing keys are initialized
//! with built-in defaults and written back for consistency.

use pathways_common::{Error, Result};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::info;

/// Detector periods, thresholds, and scan bounds
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Master switch for the scheduler
    pub enabled: bool,

    /// Attendance-gap detector period (default: 6h)
    pub attendance_scan_interval_secs: u64,

    /// Completion-lag detector period (default: daily)
    pub completion_scan_interval_secs: u64,

    /// Status monitor period (default: hourly)
    pub status_scan_interval_secs: u64,

    /// Consistency scanner period (default: daily)
    pub consistency_scan_interval_secs: u64,

    /// Hours without any cohort attendance before an alert (default: 48)
    pub attendance_gap_hours: i64,

    /// Completion-rate lag fraction of the program average that triggers a
    /// warning (default: 0.20)
    pub completion_lag_ratio: f64,

    /// Lag fraction that escalates to critical (default: 0.40)
    pub completion_critical_ratio: f64,

    /// Days without attendance before an active enrollment is stale (default: 7)
    pub attendance_stale_days: i64,

    /// How far back the status monitor looks for new draft surveys (default: 1h)
    pub survey_draft_window_secs: i64,

    /// Upper bound on a single partner's scan (default: 30s)
    pub partner_scan_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            attendance_scan_interval_secs: 21_600,
            completion_scan_interval_secs: 86_400,
            status_scan_interval_secs: 3_600,
            consistency_scan_interval_secs: 86_400,
            attendance_gap_hours: 48,
            completion_lag_ratio: 0.20,
            completion_critical_ratio: 0.40,
            attendance_stale_days: 7,
            survey_draft_window_secs: 3_600,
            partner_scan_timeout_secs: 30,
        }
    }
}

impl MonitorConfig {
    /// Load monitor configuration from the settings table
    ///
    /// For each setting: read from database; if missing, use the built-in
    /// default and write it back.
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            enabled: get_setting(pool, "monitor_enabled", defaults.enabled, parse_bool).await?,
            attendance_scan_interval_secs: get_setting(
                pool,
                "monitor_attendance_scan_interval_secs",
                defaults.attendance_scan_interval_secs,
                parse_u64,
            )
            .await?,
            completion_scan_interval_secs: get_setting(
                pool,
                "monitor_completion_scan_interval_secs",
                defaults.completion_scan_interval_secs,
                parse_u64,
            )
            .await?,
            status_scan_interval_secs: get_setting(
                pool,
                "monitor_status_scan_interval_secs",
                defaults.status_scan_interval_secs,
                parse_u64,
            )
            .await?,
            consistency_scan_interval_secs: get_setting(
                pool,
                "monitor_consistency_scan_interval_secs",
                defaults.consistency_scan_interval_secs,
                parse_u64,
            )
            .await?,
            attendance_gap_hours: get_setting(
                pool,
                "monitor_attendance_gap_hours",
                defaults.attendance_gap_hours,
                parse_i64,
            )
            .await?,
            completion_lag_ratio: get_setting(
                pool,
                "monitor_completion_lag_ratio",
                defaults.completion_lag_ratio,
                parse_f64,
            )
            .await?,
            completion_critical_ratio: get_setting(
                pool,
                "monitor_completion_critical_ratio",
                defaults.completion_critical_ratio,
                parse_f64,
            )
            .await?,
            attendance_stale_days: get_setting(
                pool,
                "monitor_attendance_stale_days",
                defaults.attendance_stale_days,
                parse_i64,
            )
            .await?,
            survey_draft_window_secs: get_setting(
                pool,
                "monitor_survey_draft_window_secs",
                defaults.survey_draft_window_secs,
                parse_i64,
            )
            .await?,
            partner_scan_timeout_secs: get_setting(
                pool,
                "monitor_partner_scan_timeout_secs",
                defaults.partner_scan_timeout_secs,
                parse_u64,
            )
            .await?,
        };

        info!("Loaded monitor configuration from database");
        Ok(config)
    }

    /// Per-partner scan bound as a Duration
    pub fn partner_scan_timeout(&self) -> Duration {
        Duration::from_secs(self.partner_scan_timeout_secs)
    }
}

/// Read a setting, falling back to (and persisting) the default when missing
async fn get_setting<T>(
    pool: &SqlitePool,
    key: &str,
    default: T,
    parse: fn(&str) -> Result<T>,
) -> Result<T>
where
    T: ToString,
{
    let value_opt: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match value_opt {
        Some(value) => parse(&value),
        None => {
            info!("Setting '{}' not found in database, using default: {}", key, default.to_string());
            sqlx::query(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
            )
            .bind(key)
            .bind(default.to_string())
            .execute(pool)
            .await?;
            Ok(default)
        }
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    Ok(s.eq_ignore_ascii_case("true") || s == "1")
}

fn parse_u64(s: &str) -> Result<u64> {
    s.parse::<u64>()
        .map_err(|e| Error::Config(format!("Invalid u64: {}", e)))
}

fn parse_i64(s: &str) -> Result<i64> {
    s.parse::<i64>()
        .map_err(|e| Error::Config(format!("Invalid i64: {}", e)))
}

fn parse_f64(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|e| Error::Config(format!("Invalid f64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathways_common::db::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert!(config.enabled);
        assert_eq!(config.attendance_gap_hours, 48);
        assert_eq!(config.attendance_stale_days, 7);
        assert_eq!(config.completion_lag_ratio, 0.20);
        assert_eq!(config.completion_critical_ratio, 0.40);
    }

    #[tokio::test]
    async fn test_load_writes_back_missing_settings() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();

        // Empty settings table: load() should fall back to defaults and persist them
        let config = MonitorConfig::load(&pool).await.unwrap();
        assert_eq!(config.attendance_gap_hours, 48);

        let stored: String =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = 'monitor_attendance_gap_hours'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(stored, "48");
    }

    #[tokio::test]
    async fn test_load_honors_stored_values() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO settings (key, value) VALUES ('monitor_attendance_gap_hours', '24')")
            .execute(&pool)
            .await
            .unwrap();

        let config = MonitorConfig::load(&pool).await.unwrap();
        assert_eq!(config.attendance_gap_hours, 24);
    }
}
