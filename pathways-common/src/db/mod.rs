//! Shared database access for Pathways services

pub mod init;
pub mod models;

pub use init::{create_schema, init_database};

use crate::{Error, Result};
use uuid::Uuid;

/// Parse a TEXT guid column into a Uuid
pub fn parse_guid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::InvalidInput(format!("Invalid guid '{}': {}", value, e)))
}
