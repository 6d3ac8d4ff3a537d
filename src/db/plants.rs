//! Plant database operations
//!
//! Every query is scoped to an owner where the caller supplies one; rotation
//! order is never read or written across owners.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use super::models::PlantRow;
use crate::domain::Plant;

/// Insert a plant and return its id
#[allow(clippy::too_many_arguments)]
pub async fn insert_plant(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    name: &str,
    address: &str,
    latitude: f64,
    longitude: f64,
    sequence_order: i64,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO plants (owner_id, name, address, latitude, longitude, sequence_order, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(name)
    .bind(address)
    .bind(latitude)
    .bind(longitude)
    .bind(sequence_order)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(ex)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a plant by id, scoped to its owner
pub async fn get_plant(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    plant_id: i64,
) -> Result<Option<Plant>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlantRow>("SELECT * FROM plants WHERE id = ? AND owner_id = ?")
        .bind(plant_id)
        .bind(owner_id)
        .fetch_optional(ex)
        .await?;

    Ok(row.map(|r| r.to_plant()))
}

/// List an owner's plants, rotation order first, unsequenced plants last
pub async fn list_plants(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
) -> Result<Vec<Plant>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PlantRow>(
        "SELECT * FROM plants WHERE owner_id = ?
         ORDER BY sequence_order IS NULL, sequence_order ASC, name ASC",
    )
    .bind(owner_id)
    .fetch_all(ex)
    .await?;

    Ok(rows.iter().map(|r| r.to_plant()).collect())
}

/// Update a plant's descriptive fields; returns false when no row matched
pub async fn update_plant_fields(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    plant_id: i64,
    plant: &Plant,
    now: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE plants SET name = ?, address = ?, latitude = ?, longitude = ?, updated_at = ?
         WHERE id = ? AND owner_id = ?",
    )
    .bind(&plant.name)
    .bind(&plant.address)
    .bind(plant.latitude)
    .bind(plant.longitude)
    .bind(now.to_rfc3339())
    .bind(plant_id)
    .bind(owner_id)
    .execute(ex)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a plant; visits and their checklist rows cascade
pub async fn delete_plant(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    plant_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM plants WHERE id = ? AND owner_id = ?")
        .bind(plant_id)
        .bind(owner_id)
        .execute(ex)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Highest rotation position currently assigned for an owner
pub async fn max_sequence_order(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
) -> Result<Option<i64>, sqlx::Error> {
    let row: (Option<i64>,) =
        sqlx::query_as("SELECT MAX(sequence_order) FROM plants WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(ex)
            .await?;

    Ok(row.0)
}

/// An owner's sequenced plants in rotation order
pub async fn sequenced_plants(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
) -> Result<Vec<Plant>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PlantRow>(
        "SELECT * FROM plants WHERE owner_id = ? AND sequence_order IS NOT NULL
         ORDER BY sequence_order ASC",
    )
    .bind(owner_id)
    .fetch_all(ex)
    .await?;

    Ok(rows.iter().map(|r| r.to_plant()).collect())
}

/// The owner's plant with the smallest order strictly greater than `order`
pub async fn next_in_rotation(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
    order: i64,
) -> Result<Option<Plant>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlantRow>(
        "SELECT * FROM plants WHERE owner_id = ? AND sequence_order > ?
         ORDER BY sequence_order ASC LIMIT 1",
    )
    .bind(owner_id)
    .bind(order)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(|r| r.to_plant()))
}

/// The owner's plant with the smallest order overall
pub async fn first_in_rotation(
    ex: impl SqliteExecutor<'_>,
    owner_id: &str,
) -> Result<Option<Plant>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlantRow>(
        "SELECT * FROM plants WHERE owner_id = ? AND sequence_order IS NOT NULL
         ORDER BY sequence_order ASC LIMIT 1",
    )
    .bind(owner_id)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(|r| r.to_plant()))
}

/// Set only the next maintenance date
pub async fn set_next_maintenance_date(
    ex: impl SqliteExecutor<'_>,
    plant_id: i64,
    next: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE plants SET next_maintenance_date = ?, updated_at = ? WHERE id = ?")
        .bind(next.map(|d| d.to_rfc3339()))
        .bind(now.to_rfc3339())
        .bind(plant_id)
        .execute(ex)
        .await?;

    Ok(())
}

/// Set both maintenance dates in one statement
pub async fn set_maintenance_dates(
    ex: impl SqliteExecutor<'_>,
    plant_id: i64,
    last: Option<DateTime<Utc>>,
    next: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE plants SET last_maintenance_date = ?, next_maintenance_date = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(last.map(|d| d.to_rfc3339()))
    .bind(next.map(|d| d.to_rfc3339()))
    .bind(now.to_rfc3339())
    .bind(plant_id)
    .execute(ex)
    .await?;

    Ok(())
}

/// Move a plant to a new rotation position
pub async fn set_sequence_order(
    ex: impl SqliteExecutor<'_>,
    plant_id: i64,
    order: i64,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE plants SET sequence_order = ?, updated_at = ? WHERE id = ?")
        .bind(order)
        .bind(now.to_rfc3339())
        .bind(plant_id)
        .execute(ex)
        .await?;

    Ok(())
}
