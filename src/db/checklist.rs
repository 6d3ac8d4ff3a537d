//! Checklist catalog and completion ledger database operations

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use super::models::{ChecklistItemRow, CompletedItemRow};
use crate::domain::{ChecklistItem, CompletedChecklistItem};

/// All catalog entries ordered by id ascending
pub async fn list_checklist_items(
    ex: impl SqliteExecutor<'_>,
) -> Result<Vec<ChecklistItem>, sqlx::Error> {
    let rows =
        sqlx::query_as::<_, ChecklistItemRow>("SELECT * FROM checklist_items ORDER BY id ASC")
            .fetch_all(ex)
            .await?;

    Ok(rows.iter().map(|r| r.to_item()).collect())
}

/// Insert a catalog entry, tolerating a concurrent seed of the same description
pub async fn insert_checklist_item_if_absent(
    ex: impl SqliteExecutor<'_>,
    description: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO checklist_items (description) VALUES (?)")
        .bind(description)
        .execute(ex)
        .await?;

    Ok(())
}

/// The ledger row for one (visit, catalog item) pair
pub async fn get_completed_item(
    ex: impl SqliteExecutor<'_>,
    visit_id: i64,
    checklist_item_id: i64,
) -> Result<Option<CompletedChecklistItem>, sqlx::Error> {
    let row = sqlx::query_as::<_, CompletedItemRow>(
        "SELECT * FROM completed_checklist_items WHERE visit_id = ? AND checklist_item_id = ?",
    )
    .bind(visit_id)
    .bind(checklist_item_id)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(|r| r.to_item()))
}

/// A visit's full completion ledger
pub async fn list_completed_items(
    ex: impl SqliteExecutor<'_>,
    visit_id: i64,
) -> Result<Vec<CompletedChecklistItem>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CompletedItemRow>(
        "SELECT * FROM completed_checklist_items WHERE visit_id = ? ORDER BY checklist_item_id ASC",
    )
    .bind(visit_id)
    .fetch_all(ex)
    .await?;

    Ok(rows.iter().map(|r| r.to_item()).collect())
}

/// Insert a ledger row
pub async fn insert_completed_item(
    ex: impl SqliteExecutor<'_>,
    visit_id: i64,
    checklist_item_id: i64,
    completed: bool,
    notes: &str,
    completed_at: Option<DateTime<Utc>>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO completed_checklist_items
             (visit_id, checklist_item_id, completed, notes, completed_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(visit_id)
    .bind(checklist_item_id)
    .bind(completed as i64)
    .bind(notes)
    .bind(completed_at.map(|d| d.to_rfc3339()))
    .execute(ex)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Update an existing ledger row in place
pub async fn update_completed_item(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    completed: bool,
    notes: &str,
    completed_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE completed_checklist_items SET completed = ?, notes = ?, completed_at = ? WHERE id = ?",
    )
    .bind(completed as i64)
    .bind(notes)
    .bind(completed_at.map(|d| d.to_rfc3339()))
    .bind(id)
    .execute(ex)
    .await?;

    Ok(())
}
