//! Database row models for SQLx
//!
//! Timestamps are stored as RFC3339 text; booleans as integers.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{ChecklistItem, CompletedChecklistItem, MaintenanceVisit, Plant};

pub(crate) fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn parse_opt_ts(s: Option<&String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

/// Plant row from database
#[derive(Debug, Clone, FromRow)]
pub struct PlantRow {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_maintenance_date: Option<String>,
    pub next_maintenance_date: Option<String>,
    pub sequence_order: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl PlantRow {
    pub fn to_plant(&self) -> Plant {
        Plant {
            id: self.id,
            owner_id: self.owner_id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            last_maintenance_date: parse_opt_ts(self.last_maintenance_date.as_ref()),
            next_maintenance_date: parse_opt_ts(self.next_maintenance_date.as_ref()),
            sequence_order: self.sequence_order,
            created_at: parse_ts(&self.created_at),
            updated_at: parse_ts(&self.updated_at),
        }
    }
}

/// Maintenance visit row from database
#[derive(Debug, Clone, FromRow)]
pub struct VisitRow {
    pub id: i64,
    pub plant_id: i64,
    pub owner_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_completed: i64,
    pub notes: String,
    pub route: Option<String>,
    pub arrival_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl VisitRow {
    pub fn to_visit(&self) -> MaintenanceVisit {
        MaintenanceVisit {
            id: self.id,
            plant_id: self.plant_id,
            owner_id: self.owner_id.clone(),
            start_date: parse_ts(&self.start_date),
            end_date: parse_opt_ts(self.end_date.as_ref()),
            is_completed: self.is_completed != 0,
            notes: self.notes.clone(),
            route: self.route.clone(),
            arrival_time: parse_opt_ts(self.arrival_time.as_ref()),
            created_at: parse_ts(&self.created_at),
            updated_at: parse_ts(&self.updated_at),
        }
    }
}

/// Checklist catalog row from database
#[derive(Debug, Clone, FromRow)]
pub struct ChecklistItemRow {
    pub id: i64,
    pub description: String,
}

impl ChecklistItemRow {
    pub fn to_item(&self) -> ChecklistItem {
        ChecklistItem {
            id: self.id,
            description: self.description.clone(),
        }
    }
}

/// Completed checklist item row from database
#[derive(Debug, Clone, FromRow)]
pub struct CompletedItemRow {
    pub id: i64,
    pub visit_id: i64,
    pub checklist_item_id: i64,
    pub completed: i64,
    pub notes: String,
    pub completed_at: Option<String>,
}

impl CompletedItemRow {
    pub fn to_item(&self) -> CompletedChecklistItem {
        CompletedChecklistItem {
            id: self.id,
            visit_id: self.visit_id,
            checklist_item_id: self.checklist_item_id,
            completed: self.completed != 0,
            notes: self.notes.clone(),
            completed_at: parse_opt_ts(self.completed_at.as_ref()),
        }
    }
}
