//! Audit log writes
//!
//! Appends are fire-and-forget: they run on a spawned task and a failed
//! write is logged, never surfaced to the operation that triggered it.

use chrono::Utc;
use pathways_common::Result;
use sqlx::SqlitePool;
use tracing::warn;

/// Append an audit entry
pub async fn append(
    pool: &SqlitePool,
    actor_id: &str,
    action: &str,
    entity_type: &str,
    entity_id: &str,
    description: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_log (actor_id, action, entity_type, entity_id, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(actor_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(description)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Append an audit entry without blocking the caller
pub fn append_detached(
    pool: SqlitePool,
    actor_id: String,
    action: String,
    entity_type: String,
    entity_id: String,
    description: String,
) {
    tokio::spawn(async move {
        if let Err(e) =
            append(&pool, &actor_id, &action, &entity_type, &entity_id, &description).await
        {
            warn!("Failed to append audit entry for {} {}: {}", action, entity_id, e);
        }
    });
}
