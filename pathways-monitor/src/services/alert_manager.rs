//! Alert lifecycle manager
//!
//! The only legitimate path for creating or resolving alerts. Creation goes
//! through the atomic dedup insert; resolution is a single irreversible
//! transition. Notification delivery and audit writes are side effects that
//! never fail the alert operation itself.

use crate::db;
use crate::services::Notifier;
use crate::types::{Alert, AlertCandidate};
use pathways_common::{time, Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

/// Actor recorded in the audit log for detector-raised alerts
const SYSTEM_ACTOR: &str = "monitor";

pub struct AlertManager {
    pool: SqlitePool,
    notifier: Notifier,
}

impl AlertManager {
    pub fn new(pool: SqlitePool) -> Self {
        let notifier = Notifier::new(pool.clone());
        Self { pool, notifier }
    }

    /// Raise an alert from a detector candidate
    ///
    /// Idempotent per open (partner, type, related entity) tuple: if an
    /// unresolved alert for the tuple already exists, this is a no-op and
    /// returns None. On a novel insert the notification and audit side
    /// effects run best-effort.
    pub async fn raise(
        &self,
        partner_id: Uuid,
        candidate: &AlertCandidate,
    ) -> Result<Option<Alert>> {
        let now = time::now();
        let Some(alert) = db::alerts::insert_open_alert(&self.pool, partner_id, candidate, now).await?
        else {
            debug!(
                "Suppressed duplicate {} alert for partner {} entity {}",
                candidate.alert_type.as_str(),
                partner_id,
                candidate.related_entity_id
            );
            return Ok(None);
        };

        info!(
            "Raised {} {} alert for partner {} (entity {} {}, issue count {})",
            alert.severity.as_str(),
            alert.alert_type.as_str(),
            partner_id,
            alert.related_entity_type.as_str(),
            alert.related_entity_id,
            alert.issue_count
        );

        self.notifier.deliver(&alert).await;

        db::audit::append_detached(
            self.pool.clone(),
            SYSTEM_ACTOR.to_string(),
            "alert.raise".to_string(),
            "alert".to_string(),
            alert.guid.to_string(),
            alert.title.clone(),
        );

        Ok(Some(alert))
    }

    /// List a partner's alerts, most severe first, then most recent first
    pub async fn list(&self, partner_id: Uuid, resolved: Option<bool>) -> Result<Vec<Alert>> {
        db::alerts::list_alerts(&self.pool, partner_id, resolved).await
    }

    /// Resolve an open alert on behalf of an actor
    ///
    /// Fails with NotFound if the alert does not exist, AccessDenied if it
    /// belongs to a different partner, and Conflict if it was already
    /// resolved (the original resolution metadata is left untouched).
    pub async fn resolve(&self, partner_id: Uuid, alert_id: Uuid, actor_id: Uuid) -> Result<Alert> {
        let alert = db::alerts::load_alert(&self.pool, alert_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("alert {}", alert_id)))?;

        if alert.partner_id != partner_id {
            return Err(Error::AccessDenied(format!(
                "alert {} does not belong to partner {}",
                alert_id, partner_id
            )));
        }

        if alert.is_resolved {
            return Err(Error::Conflict(format!(
                "alert {} was already resolved at {}",
                alert_id,
                alert
                    .resolved_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown time".to_string())
            )));
        }

        let resolved_at = time::now();
        let updated = db::alerts::mark_resolved(&self.pool, alert_id, actor_id, resolved_at).await?;
        if !updated {
            // Lost the race to a concurrent resolve
            return Err(Error::Conflict(format!("alert {} was already resolved", alert_id)));
        }

        info!("Alert {} resolved by {}", alert_id, actor_id);

        db::audit::append_detached(
            self.pool.clone(),
            actor_id.to_string(),
            "alert.resolve".to_string(),
            "alert".to_string(),
            alert_id.to_string(),
            alert.title.clone(),
        );

        Ok(Alert {
            is_resolved: true,
            resolved_by: Some(actor_id),
            resolved_at: Some(resolved_at),
            ..alert
        })
    }
}
