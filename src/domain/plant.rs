//! Plant domain model - an owned physical asset in the maintenance rotation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A plant is a physical asset owned by a single user. Plants with a
/// non-null `sequence_order` participate in the owner's maintenance rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    /// Position in the owner's rotation; unique per owner when present
    pub sequence_order: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plant {
    /// Whether this plant participates in the maintenance rotation
    pub fn in_rotation(&self) -> bool {
        self.sequence_order.is_some()
    }
}

/// Request to register a new plant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Request to edit a plant's descriptive fields; rotation state is untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
