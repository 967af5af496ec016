//! Anomaly detectors
//!
//! Each detector is a pure read-only evaluator: given a partner, the current
//! time, and the data store, it produces zero or more [`AlertCandidate`]s.
//! Detectors never write and never deduplicate - multiple detectors may
//! coincidentally target the same entity, and collapsing those is the
//! lifecycle manager's job.
//!
//! Time is passed in rather than read from the wall clock so tests can pin it.
//!
//! [`AlertCandidate`]: crate::types::AlertCandidate

pub mod attendance_gap;
pub mod completion_lag;
pub mod consistency;
pub mod status_monitor;
