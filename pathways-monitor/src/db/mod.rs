//! Database access for pathways-monitor
//!
//! One query module per table. Every query is partner-parameterized in SQL;
//! nothing is filtered client-side after the fact.

pub mod alerts;
pub mod attendance;
pub mod audit;
pub mod cohorts;
pub mod enrollments;
pub mod notifications;
pub mod participants;
pub mod partners;
pub mod scores;
pub mod surveys;
pub mod users;

pub use pathways_common::db::parse_guid;
