//! # Pathways Monitor
//!
//! Partner-scoped monitoring and alerting engine. Periodic detectors inspect
//! operational data (attendance, survey completion, enrollment consistency,
//! score validity) for anomalies; novel findings become alerts and
//! notifications, deduplicated against previously raised issues.
//!
//! - [`detectors`] - read-only rule evaluators producing alert candidates
//! - [`services::AlertManager`] - the only path that creates or resolves alerts
//! - [`services::Scheduler`] - periodic per-partner detector passes
//! - [`services::Notifier`] - best-effort notification delivery

pub mod config;
pub mod db;
pub mod detectors;
pub mod services;
pub mod types;

pub use config::MonitorConfig;
pub use services::{AlertManager, Notifier, Scheduler};
