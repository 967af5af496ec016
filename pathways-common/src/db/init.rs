//! Database initialization
//!
//! Creates the Pathways schema on first run and opens the shared pool with
//! the pragmas every service relies on (WAL, foreign keys, busy timeout).
//! All create statements are idempotent so repeated startup is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer; detector passes read
    // while the lifecycle manager writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all Pathways tables (idempotent - safe to call multiple times)
///
/// Exposed separately from [`init_database`] so tests can run the real
/// schema against an in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_partners_table(pool).await?;
    create_users_table(pool).await?;
    create_participants_table(pool).await?;
    create_cohorts_table(pool).await?;
    create_enrollments_table(pool).await?;
    create_attendance_records_table(pool).await?;
    create_scores_table(pool).await?;
    create_surveys_table(pool).await?;
    create_survey_responses_table(pool).await?;
    create_alerts_table(pool).await?;
    create_notifications_table(pool).await?;
    create_audit_log_table(pool).await?;
    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_partners_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS partners (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            display_name TEXT NOT NULL,
            email TEXT,
            role TEXT NOT NULL DEFAULT 'staff',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_users_partner_role ON users(partner_id, role)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_participants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            display_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_participants_partner ON participants(partner_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_cohorts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cohorts (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            start_date TEXT,
            end_date TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_cohorts_partner_status ON cohorts(partner_id, status)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_enrollments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrollments (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            cohort_id TEXT NOT NULL REFERENCES cohorts(guid),
            participant_id TEXT NOT NULL REFERENCES participants(guid),
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_enrollments_partner_status ON enrollments(partner_id, status)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_enrollments_cohort ON enrollments(cohort_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_attendance_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            enrollment_id TEXT NOT NULL REFERENCES enrollments(guid),
            session_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'present',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_attendance_enrollment_date ON attendance_records(enrollment_id, session_date)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_scores_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            enrollment_id TEXT NOT NULL REFERENCES enrollments(guid),
            module_name TEXT NOT NULL,
            value REAL NOT NULL,
            max_value REAL NOT NULL,
            assessed_on TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scores_partner ON scores(partner_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_surveys_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS surveys (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            title TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_surveys_partner_status ON surveys(partner_id, status)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_survey_responses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS survey_responses (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            survey_id TEXT NOT NULL REFERENCES surveys(guid),
            participant_id TEXT REFERENCES participants(guid),
            status TEXT NOT NULL DEFAULT 'pending',
            submitted_at TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_responses_survey_status ON survey_responses(survey_id, status)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_alerts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            guid TEXT PRIMARY KEY,
            partner_id TEXT NOT NULL REFERENCES partners(guid),
            alert_type TEXT NOT NULL,
            severity TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            issue_count INTEGER NOT NULL DEFAULT 0,
            call_to_action TEXT,
            related_entity_type TEXT NOT NULL,
            related_entity_id TEXT NOT NULL,
            is_resolved INTEGER NOT NULL DEFAULT 0,
            resolved_by TEXT,
            resolved_at TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one unresolved alert per (partner, type, related entity).
    // INSERT .. ON CONFLICT DO NOTHING against this index is the dedup path.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_alerts_open_dedup
        ON alerts(partner_id, alert_type, related_entity_id)
        WHERE is_resolved = 0
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_alerts_partner_resolved ON alerts(partner_id, is_resolved)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_notifications_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(guid),
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            notif_type TEXT NOT NULL,
            priority TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_notifications_user_read ON notifications(user_id, is_read)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_audit_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            actor_id TEXT NOT NULL,
            action TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Initialize default settings (INSERT OR IGNORE - preserves existing values)
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    let defaults: &[(&str, &str)] = &[
        // Monitor scheduling periods (seconds)
        ("monitor_enabled", "true"),
        ("monitor_attendance_scan_interval_secs", "21600"),
        ("monitor_completion_scan_interval_secs", "86400"),
        ("monitor_status_scan_interval_secs", "3600"),
        ("monitor_consistency_scan_interval_secs", "86400"),
        // Detector thresholds
        ("monitor_attendance_gap_hours", "48"),
        ("monitor_completion_lag_ratio", "0.20"),
        ("monitor_completion_critical_ratio", "0.40"),
        ("monitor_attendance_stale_days", "7"),
        ("monitor_survey_draft_window_secs", "3600"),
        // Per-partner scan bound
        ("monitor_partner_scan_timeout_secs", "30"),
    ];

    for (key, value) in defaults {
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }

    Ok(())
}
