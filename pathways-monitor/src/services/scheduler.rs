//! Detector scheduler
//!
//! Runs each detector on its own fixed period. A pass enumerates active
//! partners and scans them one at a time; a single partner's failure or
//! timeout is logged and skipped so it can never block detection for the
//! rest. Passes are also directly invocable so tests trigger them without
//! waiting on real time.

use crate::config::MonitorConfig;
use crate::db;
use crate::detectors;
use crate::services::AlertManager;
use chrono::{DateTime, Utc};
use pathways_common::{time, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};
use uuid::Uuid;

/// The detectors the scheduler drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    AttendanceGap,
    CompletionLag,
    StatusMonitor,
    Consistency,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 4] = [
        DetectorKind::AttendanceGap,
        DetectorKind::CompletionLag,
        DetectorKind::StatusMonitor,
        DetectorKind::Consistency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetectorKind::AttendanceGap => "attendance-gap",
            DetectorKind::CompletionLag => "completion-lag",
            DetectorKind::StatusMonitor => "status-monitor",
            DetectorKind::Consistency => "consistency",
        }
    }
}

/// Outcome of one detector pass over all partners
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanSummary {
    pub partners_scanned: usize,
    pub partners_failed: usize,
    pub alerts_raised: usize,
}

pub struct Scheduler {
    pool: SqlitePool,
    config: MonitorConfig,
    manager: AlertManager,
}

impl Scheduler {
    pub fn new(pool: SqlitePool, config: MonitorConfig) -> Self {
        let manager = AlertManager::new(pool.clone());
        Self { pool, config, manager }
    }

    /// The lifecycle manager backing this scheduler (also the read API for
    /// callers listing or resolving alerts)
    pub fn manager(&self) -> &AlertManager {
        &self.manager
    }

    /// Start one periodic loop per detector (spawns background tasks)
    pub fn run(self: Arc<Self>) {
        if !self.config.enabled {
            info!("Monitor scheduler disabled by configuration");
            return;
        }

        for kind in DetectorKind::ALL {
            let scheduler = Arc::clone(&self);
            let period = scheduler.period_for(kind);
            info!("Starting {} detector (every {}s)", kind.label(), period.as_secs());

            tokio::spawn(async move {
                let mut timer = interval(period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    timer.tick().await;
                    let summary = scheduler.run_detector(kind).await;
                    info!(
                        "{} pass complete: {} partners scanned, {} failed, {} alerts raised",
                        kind.label(),
                        summary.partners_scanned,
                        summary.partners_failed,
                        summary.alerts_raised
                    );
                }
            });
        }
    }

    /// Run one full pass of a detector over all active partners
    ///
    /// Partner failures and timeouts are counted and logged, never
    /// propagated - one partner's malformed data must not block the rest.
    pub async fn run_detector(&self, kind: DetectorKind) -> ScanSummary {
        let mut summary = ScanSummary::default();

        let partners = match db::partners::list_active_partners(&self.pool).await {
            Ok(partners) => partners,
            Err(e) => {
                error!("{} pass aborted: failed to enumerate partners: {}", kind.label(), e);
                return summary;
            }
        };

        let now = time::now();
        for partner in partners {
            summary.partners_scanned += 1;

            let scan = self.scan_partner(kind, partner.guid, now);
            match tokio::time::timeout(self.config.partner_scan_timeout(), scan).await {
                Ok(Ok(raised)) => summary.alerts_raised += raised,
                Ok(Err(e)) => {
                    summary.partners_failed += 1;
                    warn!(
                        "{} scan failed for partner {} ({}): {}",
                        kind.label(),
                        partner.name,
                        partner.guid,
                        e
                    );
                }
                Err(_) => {
                    summary.partners_failed += 1;
                    warn!(
                        "{} scan timed out for partner {} ({}) after {:?}",
                        kind.label(),
                        partner.name,
                        partner.guid,
                        self.config.partner_scan_timeout()
                    );
                }
            }
        }

        summary
    }

    /// Scan a single partner: run the detector, raise what survives dedup
    async fn scan_partner(
        &self,
        kind: DetectorKind,
        partner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let candidates = match kind {
            DetectorKind::AttendanceGap => {
                detectors::attendance_gap::scan(&self.pool, partner_id, now, &self.config).await?
            }
            DetectorKind::CompletionLag => {
                detectors::completion_lag::scan(&self.pool, partner_id, now, &self.config).await?
            }
            DetectorKind::StatusMonitor => {
                detectors::status_monitor::scan(&self.pool, partner_id, now, &self.config).await?
            }
            DetectorKind::Consistency => {
                detectors::consistency::scan(&self.pool, partner_id, now, &self.config).await?
            }
        };

        let mut raised = 0;
        for candidate in &candidates {
            if self.manager.raise(partner_id, candidate).await?.is_some() {
                raised += 1;
            }
        }
        Ok(raised)
    }

    fn period_for(&self, kind: DetectorKind) -> Duration {
        let secs = match kind {
            DetectorKind::AttendanceGap => self.config.attendance_scan_interval_secs,
            DetectorKind::CompletionLag => self.config.completion_scan_interval_secs,
            DetectorKind::StatusMonitor => self.config.status_scan_interval_secs,
            DetectorKind::Consistency => self.config.consistency_scan_interval_secs,
        };
        Duration::from_secs(secs)
    }
}
