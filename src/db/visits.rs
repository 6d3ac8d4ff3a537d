//! Maintenance visit database operations

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use super::models::VisitRow;
use crate::domain::MaintenanceVisit;

/// Values for a new visit row
#[derive(Debug, Clone)]
pub struct NewVisit<'a> {
    pub plant_id: i64,
    pub owner_id: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: &'a str,
}

/// Insert a visit and return its id
pub async fn insert_visit(
    ex: impl SqliteExecutor<'_>,
    visit: &NewVisit<'_>,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO maintenance_visits
             (plant_id, owner_id, start_date, end_date, is_completed, notes, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(visit.plant_id)
    .bind(visit.owner_id)
    .bind(visit.start_date.to_rfc3339())
    .bind(visit.end_date.map(|d| d.to_rfc3339()))
    .bind(visit.end_date.is_some() as i64)
    .bind(visit.notes)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(ex)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a visit by id, scoped to its owner
pub async fn get_visit(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    visit_id: i64,
) -> Result<Option<MaintenanceVisit>, sqlx::Error> {
    let row = sqlx::query_as::<_, VisitRow>(
        "SELECT * FROM maintenance_visits WHERE id = ? AND owner_id = ?",
    )
    .bind(visit_id)
    .bind(owner_id)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(|r| r.to_visit()))
}

/// List an owner's visits by ascending start date
pub async fn list_visits(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
) -> Result<Vec<MaintenanceVisit>, sqlx::Error> {
    let rows = sqlx::query_as::<_, VisitRow>(
        "SELECT * FROM maintenance_visits WHERE owner_id = ? ORDER BY start_date ASC",
    )
    .bind(owner_id)
    .fetch_all(ex)
    .await?;

    Ok(rows.iter().map(|r| r.to_visit()).collect())
}

/// The plant's pending visit, if any (at most one by construction)
pub async fn pending_visit_for_plant(
    ex: impl SqliteExecutor<'_>,
    plant_id: i64,
) -> Result<Option<MaintenanceVisit>, sqlx::Error> {
    let row = sqlx::query_as::<_, VisitRow>(
        "SELECT * FROM maintenance_visits WHERE plant_id = ? AND end_date IS NULL LIMIT 1",
    )
    .bind(plant_id)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(|r| r.to_visit()))
}

/// The plant's earliest upcoming pending visit
pub async fn next_scheduled_for_plant(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    plant_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<MaintenanceVisit>, sqlx::Error> {
    let row = sqlx::query_as::<_, VisitRow>(
        "SELECT * FROM maintenance_visits
         WHERE plant_id = ? AND owner_id = ? AND end_date IS NULL AND start_date >= ?
         ORDER BY start_date ASC LIMIT 1",
    )
    .bind(plant_id)
    .bind(owner_id)
    .bind(now.to_rfc3339())
    .fetch_optional(ex)
    .await?;

    Ok(row.map(|r| r.to_visit()))
}

/// Count every visit ever recorded for an owner
pub async fn count_visits_for_owner(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM maintenance_visits WHERE owner_id = ?")
        .bind(owner_id)
        .fetch_one(ex)
        .await?;

    Ok(row.0)
}

/// Mark a visit completed at `completed_at`
pub async fn mark_visit_completed(
    ex: impl SqliteExecutor<'_>,
    visit_id: i64,
    completed_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE maintenance_visits SET end_date = ?, is_completed = 1, updated_at = ? WHERE id = ?",
    )
    .bind(completed_at.to_rfc3339())
    .bind(completed_at.to_rfc3339())
    .bind(visit_id)
    .execute(ex)
    .await?;

    Ok(())
}

/// Move a visit's start date; nothing else changes
pub async fn update_start_date(
    ex: impl SqliteExecutor<'_>,
    visit_id: i64,
    start_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE maintenance_visits SET start_date = ?, updated_at = ? WHERE id = ?")
        .bind(start_date.to_rfc3339())
        .bind(now.to_rfc3339())
        .bind(visit_id)
        .execute(ex)
        .await?;

    Ok(())
}

/// Attach route metadata to a visit; nothing else changes
pub async fn update_route(
    ex: impl SqliteExecutor<'_>,
    visit_id: i64,
    route: &str,
    arrival_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE maintenance_visits SET route = ?, arrival_time = ?, updated_at = ? WHERE id = ?")
        .bind(route)
        .bind(arrival_time.map(|d| d.to_rfc3339()))
        .bind(now.to_rfc3339())
        .bind(visit_id)
        .execute(ex)
        .await?;

    Ok(())
}
