//! Alert and notification types
//!
//! All classification tags are closed enums so the compiler enforces
//! exhaustive handling wherever a tag is interpreted (severity escalation,
//! notification priority, call-to-action rendering).

use chrono::{DateTime, Utc};
use pathways_common::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anomaly class an alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    /// Cohort-wide attendance gap
    AttendanceCheck,
    /// Survey completion rate lagging the program average
    CompletionCheck,
    /// New survey still unpublished
    StatusMonitor,
    /// Enrollment with missing or stale attendance
    MissingAttendance,
    /// Score exceeding its maximum, or score without matching attendance
    ScoreMismatch,
    /// Enrollment/cohort state mismatch
    EnrollmentGap,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::AttendanceCheck => "ATTENDANCE_CHECK",
            AlertType::CompletionCheck => "COMPLETION_CHECK",
            AlertType::StatusMonitor => "STATUS_MONITOR",
            AlertType::MissingAttendance => "MISSING_ATTENDANCE",
            AlertType::ScoreMismatch => "SCORE_MISMATCH",
            AlertType::EnrollmentGap => "ENROLLMENT_GAP",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "ATTENDANCE_CHECK" => Ok(AlertType::AttendanceCheck),
            "COMPLETION_CHECK" => Ok(AlertType::CompletionCheck),
            "STATUS_MONITOR" => Ok(AlertType::StatusMonitor),
            "MISSING_ATTENDANCE" => Ok(AlertType::MissingAttendance),
            "SCORE_MISMATCH" => Ok(AlertType::ScoreMismatch),
            "ENROLLMENT_GAP" => Ok(AlertType::EnrollmentGap),
            other => Err(Error::InvalidInput(format!("Unknown alert type: {}", other))),
        }
    }
}

/// Alert severity, ordered for triage (Info < Warning < Critical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(Error::InvalidInput(format!("Unknown severity: {}", other))),
        }
    }
}

/// Entity kind an alert points back at (lookup only, never an ownership edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Cohort,
    Survey,
    Enrollment,
    Score,
    Participant,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Cohort => "cohort",
            EntityKind::Survey => "survey",
            EntityKind::Enrollment => "enrollment",
            EntityKind::Score => "score",
            EntityKind::Participant => "participant",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "cohort" => Ok(EntityKind::Cohort),
            "survey" => Ok(EntityKind::Survey),
            "enrollment" => Ok(EntityKind::Enrollment),
            "score" => Ok(EntityKind::Score),
            "participant" => Ok(EntityKind::Participant),
            other => Err(Error::InvalidInput(format!("Unknown entity kind: {}", other))),
        }
    }
}

/// Notification priority, derived from alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationPriority {
    Medium,
    High,
    Urgent,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPriority::Medium => "medium",
            NotificationPriority::High => "high",
            NotificationPriority::Urgent => "urgent",
        }
    }
}

impl From<Severity> for NotificationPriority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => NotificationPriority::Urgent,
            Severity::Warning => NotificationPriority::High,
            Severity::Info => NotificationPriority::Medium,
        }
    }
}

/// Persisted alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub guid: Uuid,
    pub partner_id: Uuid,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub issue_count: i64,
    pub call_to_action: Option<String>,
    pub related_entity_type: EntityKind,
    pub related_entity_id: Uuid,
    pub is_resolved: bool,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Unpersisted anomaly produced by a detector
///
/// Carries the alert payload but no identity or lifecycle fields; it becomes
/// an [`Alert`] only if it survives deduplication in the lifecycle manager.
#[derive(Debug, Clone)]
pub struct AlertCandidate {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub issue_count: i64,
    pub call_to_action: Option<String>,
    pub related_entity_type: EntityKind,
    pub related_entity_id: Uuid,
}
