//! Checklist catalog and per-visit completion ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry; global, read-mostly, never owner-scoped
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: i64,
    pub description: String,
}

/// Join row between a visit and a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedChecklistItem {
    pub id: i64,
    pub visit_id: i64,
    pub checklist_item_id: i64,
    pub completed: bool,
    pub notes: String,
    /// Set iff `completed`
    pub completed_at: Option<DateTime<Utc>>,
}

/// One reported checklist state for a visit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedItem {
    pub checklist_item_id: i64,
    pub completed: bool,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Batch checklist report for one visit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemsRequest {
    pub items: Option<Vec<ReportedItem>>,
}
