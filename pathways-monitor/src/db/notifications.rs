//! Notification operations
//!
//! Notifications have their own read/unread lifecycle, independent of the
//! alert that produced them.

use crate::types::NotificationPriority;
use chrono::{DateTime, Utc};
use pathways_common::db::parse_guid;
use pathways_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Notification record
#[derive(Debug, Clone)]
pub struct Notification {
    pub guid: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notif_type: String,
    pub priority: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Create a notification for a recipient
pub async fn insert_notification(
    pool: &SqlitePool,
    user_id: Uuid,
    title: &str,
    message: &str,
    notif_type: &str,
    priority: NotificationPriority,
    now: DateTime<Utc>,
) -> Result<Uuid> {
    let guid = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO notifications (guid, user_id, title, message, notif_type, priority, is_read, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(guid.to_string())
    .bind(user_id.to_string())
    .bind(title)
    .bind(message)
    .bind(notif_type)
    .bind(priority.as_str())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(guid)
}

/// Unread notifications for a recipient, newest first
pub async fn unread_notifications(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Notification>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, user_id, title, message, notif_type, priority, is_read, created_at
        FROM notifications
        WHERE user_id = ? AND is_read = 0
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut notifications = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        let user_str: String = row.get("user_id");
        let is_read: i64 = row.get("is_read");
        notifications.push(Notification {
            guid: parse_guid(&guid_str)?,
            user_id: parse_guid(&user_str)?,
            title: row.get("title"),
            message: row.get("message"),
            notif_type: row.get("notif_type"),
            priority: row.get("priority"),
            is_read: is_read != 0,
            created_at: row.get("created_at"),
        });
    }
    Ok(notifications)
}

/// Mark a notification read; returns false if it did not belong to the user
/// or was already read
pub async fn mark_read(pool: &SqlitePool, user_id: Uuid, notification_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = 1 WHERE guid = ? AND user_id = ? AND is_read = 0",
    )
    .bind(notification_id.to_string())
    .bind(user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
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

    /// Seed the parent partner + user rows that `notifications.user_id`
    /// references so inserts satisfy the foreign keys enforced by the schema.
    async fn seed_user(pool: &SqlitePool, user: Uuid) {
        let partner = Uuid::new_v4();
        sqlx::query("INSERT INTO partners (guid, name) VALUES (?, 'Test Partner')")
            .bind(partner.to_string())
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO users (guid, partner_id, display_name) VALUES (?, ?, 'Test User')")
            .bind(user.to_string())
            .bind(partner.to_string())
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unread_then_mark_read() {
        let pool = test_pool().await;
        let user = Uuid::new_v4();
        seed_user(&pool, user).await;

        let first = insert_notification(
            &pool,
            user,
            "Attendance gap",
            "Cohort 7 has gone quiet",
            "ATTENDANCE_CHECK",
            NotificationPriority::Urgent,
            Utc::now(),
        )
        .await
        .unwrap();

        let unread = unread_notifications(&pool, user).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].guid, first);
        assert_eq!(unread[0].priority, "urgent");
        assert!(!unread[0].is_read);

        assert!(mark_read(&pool, user, first).await.unwrap());
        assert!(unread_notifications(&pool, user).await.unwrap().is_empty());

        // Already read: no-op
        assert!(!mark_read(&pool, user, first).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_read_is_recipient_scoped() {
        let pool = test_pool().await;
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        seed_user(&pool, owner).await;

        let notification = insert_notification(
            &pool,
            owner,
            "Survey lagging",
            "Midpoint survey is behind",
            "COMPLETION_CHECK",
            NotificationPriority::High,
            Utc::now(),
        )
        .await
        .unwrap();

        assert!(!mark_read(&pool, stranger, notification).await.unwrap());
        assert_eq!(unread_notifications(&pool, owner).await.unwrap().len(), 1);
    }
}
