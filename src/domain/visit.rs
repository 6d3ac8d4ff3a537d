//! Maintenance visit domain model and its lifecycle state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CompletedChecklistItem;

/// One scheduled or completed maintenance event for one plant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceVisit {
    pub id: i64,
    pub plant_id: i64,
    pub owner_id: String,
    pub start_date: DateTime<Utc>,
    /// Presence means the visit is completed
    pub end_date: Option<DateTime<Utc>>,
    /// Redundant with `end_date`, tracked explicitly
    pub is_completed: bool,
    pub notes: String,
    pub route: Option<String>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceVisit {
    pub fn state(&self) -> VisitState {
        if self.end_date.is_some() {
            VisitState::Completed
        } else {
            VisitState::Scheduled
        }
    }

    /// Derived display fact, never a stored state
    pub fn in_progress_at(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_none() && now >= self.start_date
    }
}

/// Visit lifecycle: `Scheduled -> Completed`, terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitState {
    Scheduled,
    Completed,
}

impl VisitState {
    /// The only legal transition is out of `Scheduled`
    pub fn can_complete(&self) -> bool {
        matches!(self, VisitState::Scheduled)
    }
}

impl std::fmt::Display for VisitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitState::Scheduled => write!(f, "scheduled"),
            VisitState::Completed => write!(f, "completed"),
        }
    }
}

/// Request to schedule a new maintenance visit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitRequest {
    pub plant_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// UI-supplied checklist seed; defaults to an empty seed
    #[serde(default)]
    pub checklist: Vec<ChecklistSeedEntry>,
}

/// One entry of the checklist seed payload supplied at visit creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSeedEntry {
    pub checklist_item_id: i64,
    #[serde(default)]
    pub completed: bool,
    pub notes: Option<String>,
}

/// Request to move a visit's start date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStartDateRequest {
    pub start_date: Option<DateTime<Utc>>,
}

/// Request to attach route metadata to a visit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachRouteRequest {
    pub route: Option<String>,
    pub arrival_time: Option<DateTime<Utc>>,
}

/// A visit joined with its plant summary and checklist ledger
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDetail {
    #[serde(flatten)]
    pub visit: MaintenanceVisit,
    pub plant: PlantSummary,
    pub completed_items: Vec<CompletedChecklistItem>,
}

/// The plant fields the visit listing exposes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantSummary {
    pub id: i64,
    pub name: String,
    pub address: String,
}
