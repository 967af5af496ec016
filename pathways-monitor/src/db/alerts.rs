//! Alert table operations
//!
//! The open-alert dedup invariant lives here: `insert_open_alert` targets the
//! partial unique index on (partner_id, alert_type, related_entity_id) for
//! unresolved rows, so check-and-create is a single atomic statement even
//! when detector passes overlap.

use crate::types::{Alert, AlertCandidate, AlertType, EntityKind, Severity};
use chrono::{DateTime, Utc};
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Triage ordering: most severe first, then most recent first
const TRIAGE_ORDER: &str = r#"
    ORDER BY CASE severity
        WHEN 'critical' THEN 2
        WHEN 'warning' THEN 1
        ELSE 0
    END DESC, created_at DESC
"#;

/// Insert a new open alert unless an unresolved one already exists for the
/// same (partner, type, related entity) tuple
///
/// Returns the persisted alert, or None when suppressed as a duplicate.
pub async fn insert_open_alert(
    pool: &SqlitePool,
    partner_id: Uuid,
    candidate: &AlertCandidate,
    now: DateTime<Utc>,
) -> Result<Option<Alert>> {
    let guid = Uuid::new_v4();

    let result = sqlx::query(
        r#"
        INSERT INTO alerts (
            guid, partner_id, alert_type, severity, title, description,
            issue_count, call_to_action, related_entity_type, related_entity_id,
            is_resolved, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
        ON CONFLICT(partner_id, alert_type, related_entity_id) WHERE is_resolved = 0
        DO NOTHING
        "#,
    )
    .bind(guid.to_string())
    .bind(partner_id.to_string())
    .bind(candidate.alert_type.as_str())
    .bind(candidate.severity.as_str())
    .bind(&candidate.title)
    .bind(&candidate.description)
    .bind(candidate.issue_count)
    .bind(&candidate.call_to_action)
    .bind(candidate.related_entity_type.as_str())
    .bind(candidate.related_entity_id.to_string())
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Alert {
        guid,
        partner_id,
        alert_type: candidate.alert_type,
        severity: candidate.severity,
        title: candidate.title.clone(),
        description: candidate.description.clone(),
        issue_count: candidate.issue_count,
        call_to_action: candidate.call_to_action.clone(),
        related_entity_type: candidate.related_entity_type,
        related_entity_id: candidate.related_entity_id,
        is_resolved: false,
        resolved_by: None,
        resolved_at: None,
        created_at: now,
    }))
}

/// Load an alert by id (no tenant filter - the lifecycle manager checks
/// ownership so it can distinguish not-found from cross-tenant access)
pub async fn load_alert(pool: &SqlitePool, alert_id: Uuid) -> Result<Option<Alert>> {
    let row = sqlx::query("SELECT * FROM alerts WHERE guid = ?")
        .bind(alert_id.to_string())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(alert_from_row(&row)?)),
        None => Ok(None),
    }
}

/// List a partner's alerts in triage order, optionally filtered by
/// resolution state
pub async fn list_alerts(
    pool: &SqlitePool,
    partner_id: Uuid,
    resolved: Option<bool>,
) -> Result<Vec<Alert>> {
    let rows = match resolved {
        Some(resolved) => {
            let sql = format!(
                "SELECT * FROM alerts WHERE partner_id = ? AND is_resolved = ? {}",
                TRIAGE_ORDER
            );
            sqlx::query(&sql)
                .bind(partner_id.to_string())
                .bind(resolved as i64)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("SELECT * FROM alerts WHERE partner_id = ? {}", TRIAGE_ORDER);
            sqlx::query(&sql)
                .bind(partner_id.to_string())
                .fetch_all(pool)
                .await?
        }
    };

    let mut alerts = Vec::with_capacity(rows.len());
    for row in rows {
        alerts.push(alert_from_row(&row)?);
    }
    Ok(alerts)
}

/// Mark an alert resolved; returns false if it was already resolved
/// (the guard in WHERE makes the transition race-safe)
pub async fn mark_resolved(
    pool: &SqlitePool,
    alert_id: Uuid,
    actor_id: Uuid,
    resolved_at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE alerts
        SET is_resolved = 1, resolved_by = ?, resolved_at = ?
        WHERE guid = ? AND is_resolved = 0
        "#,
    )
    .bind(actor_id.to_string())
    .bind(resolved_at)
    .bind(alert_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn alert_from_row(row: &SqliteRow) -> Result<Alert> {
    let guid_str: String = row.get("guid");
    let partner_str: String = row.get("partner_id");
    let type_str: String = row.get("alert_type");
    let severity_str: String = row.get("severity");
    let entity_type_str: String = row.get("related_entity_type");
    let entity_id_str: String = row.get("related_entity_id");
    let resolved_by_str: Option<String> = row.get("resolved_by");
    let is_resolved: i64 = row.get("is_resolved");

    Ok(Alert {
        guid: parse_guid(&guid_str)?,
        partner_id: parse_guid(&partner_str)?,
        alert_type: AlertType::parse(&type_str)?,
        severity: Severity::parse(&severity_str)?,
        title: row.get("title"),
        description: row.get("description"),
        issue_count: row.get("issue_count"),
        call_to_action: row.get("call_to_action"),
        related_entity_type: EntityKind::parse(&entity_type_str)?,
        related_entity_id: parse_guid(&entity_id_str)?,
        is_resolved: is_resolved != 0,
        resolved_by: resolved_by_str.as_deref().map(parse_guid).transpose()?,
        resolved_at: row.get("resolved_at"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathways_common::db::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        create_schema(&pool).await.expect("Failed to create schema");
        pool
    }

    /// Seed the parent partner row that `alerts.partner_id` references so
    /// inserts satisfy the foreign key enforced by the schema.
    async fn seed_partner(pool: &SqlitePool, partner: Uuid) {
        sqlx::query("INSERT INTO partners (guid, name) VALUES (?, 'Test Partner')")
            .bind(partner.to_string())
            .execute(pool)
            .await
            .unwrap();
    }

    fn candidate(related: Uuid) -> AlertCandidate {
        AlertCandidate {
            alert_type: AlertType::AttendanceCheck,
            severity: Severity::Critical,
            title: "No recent attendance".to_string(),
            description: "Test".to_string(),
            issue_count: 3,
            call_to_action: None,
            related_entity_type: EntityKind::Cohort,
            related_entity_id: related,
        }
    }

    #[tokio::test]
    async fn test_insert_then_load_round_trip() {
        let pool = test_pool().await;
        let partner = Uuid::new_v4();
        let cohort = Uuid::new_v4();
        seed_partner(&pool, partner).await;

        let inserted = insert_open_alert(&pool, partner, &candidate(cohort), Utc::now())
            .await
            .unwrap()
            .expect("First insert should be novel");

        let loaded = load_alert(&pool, inserted.guid)
            .await
            .unwrap()
            .expect("Alert not found");
        assert_eq!(loaded.partner_id, partner);
        assert_eq!(loaded.alert_type, AlertType::AttendanceCheck);
        assert_eq!(loaded.severity, Severity::Critical);
        assert_eq!(loaded.issue_count, 3);
        assert_eq!(loaded.related_entity_id, cohort);
        assert!(!loaded.is_resolved);
    }

    #[tokio::test]
    async fn test_duplicate_open_alert_suppressed() {
        let pool = test_pool().await;
        let partner = Uuid::new_v4();
        let cohort = Uuid::new_v4();
        seed_partner(&pool, partner).await;

        let first = insert_open_alert(&pool, partner, &candidate(cohort), Utc::now())
            .await
            .unwrap();
        assert!(first.is_some());

        let second = insert_open_alert(&pool, partner, &candidate(cohort), Utc::now())
            .await
            .unwrap();
        assert!(second.is_none(), "Duplicate open alert must be suppressed");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_resolved_alert_frees_dedup_tuple() {
        let pool = test_pool().await;
        let partner = Uuid::new_v4();
        let cohort = Uuid::new_v4();
        seed_partner(&pool, partner).await;

        let first = insert_open_alert(&pool, partner, &candidate(cohort), Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(mark_resolved(&pool, first.guid, Uuid::new_v4(), Utc::now()).await.unwrap());

        // Issue recurring after resolution gets a fresh alert
        let second = insert_open_alert(&pool, partner, &candidate(cohort), Utc::now())
            .await
            .unwrap();
        assert!(second.is_some());
    }

    #[tokio::test]
    async fn test_mark_resolved_is_single_shot() {
        let pool = test_pool().await;
        let partner = Uuid::new_v4();
        seed_partner(&pool, partner).await;

        let alert = insert_open_alert(&pool, partner, &candidate(Uuid::new_v4()), Utc::now())
            .await
            .unwrap()
            .unwrap();

        assert!(mark_resolved(&pool, alert.guid, Uuid::new_v4(), Utc::now()).await.unwrap());
        assert!(!mark_resolved(&pool, alert.guid, Uuid::new_v4(), Utc::now()).await.unwrap());
    }
}
