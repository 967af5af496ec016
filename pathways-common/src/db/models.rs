//! Shared database models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Partner record (tenant boundary - every operational row belongs to one)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub guid: Uuid,
    pub name: String,
    pub status: String,
}

/// User record (tenant-scoped actor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub guid: Uuid,
    pub partner_id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
}
