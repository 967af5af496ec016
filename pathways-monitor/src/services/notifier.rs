//! Notification emitter
//!
//! Turns a newly raised alert into a notification for the partner's
//! designated monitor. Strictly best-effort: a missing recipient or a failed
//! write is logged and swallowed, the alert stands either way.

use crate::db;
use crate::types::{Alert, NotificationPriority};
use pathways_common::{time, Result};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct Notifier {
    pool: SqlitePool,
}

impl Notifier {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deliver a notification for a newly raised alert (best effort)
    pub async fn deliver(&self, alert: &Alert) {
        match self.try_deliver(alert).await {
            Ok(Some(notification_id)) => {
                debug!("Notification {} delivered for alert {}", notification_id, alert.guid);
            }
            Ok(None) => {
                warn!(
                    "No monitor user configured for partner {}; alert {} has no notification",
                    alert.partner_id, alert.guid
                );
            }
            Err(e) => {
                warn!("Failed to deliver notification for alert {}: {}", alert.guid, e);
            }
        }
    }

    async fn try_deliver(&self, alert: &Alert) -> Result<Option<Uuid>> {
        let Some(recipient) = db::users::find_monitor_user(&self.pool, alert.partner_id).await?
        else {
            return Ok(None);
        };

        let priority = NotificationPriority::from(alert.severity);
        let notification_id = db::notifications::insert_notification(
            &self.pool,
            recipient.guid,
            &alert.title,
            &alert.description,
            alert.alert_type.as_str(),
            priority,
            time::now(),
        )
        .await?;

        Ok(Some(notification_id))
    }
}
