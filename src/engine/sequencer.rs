//! Plant rotation sequencer
//!
//! Maintains the per-owner total order over plants and computes who is next.
//! `advance` runs inside the caller's transaction so the read of the current
//! sequence position and the write of the next plant's visit are serialized
//! against concurrent completions for the same owner.

use chrono::{DateTime, Duration, Months, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db;
use crate::domain::{CreatePlantRequest, EngineError};

/// Note attached to visits scheduled for the next plant in line
pub const AUTO_SCHEDULED_NOTE: &str = "Maintenance scheduled automatically";
/// Note attached when the rotation wraps back to the first plant
pub const CYCLE_RESTART_NOTE: &str = "Maintenance scheduled automatically (cycle restarted)";

/// The follow-up visit created by one rotation step
#[derive(Debug, Clone)]
pub struct FollowUp {
    pub plant_id: i64,
    pub visit_id: i64,
    pub scheduled_for: DateTime<Utc>,
    pub wrapped: bool,
}

/// Advance the owner's rotation after a visit of `plant_id` was created or
/// completed at `trigger_date`.
///
/// The next plant in line is scheduled 7 days out; when the trigger is last
/// in the order, the rotation wraps to the first plant one calendar month
/// out. Creates zero or one visit: the step is skipped when the trigger is
/// outside the rotation or the target already has a pending visit (which
/// covers the single-plant owner, where next and wrap both resolve to the
/// trigger itself). The trigger's own `next_maintenance_date` is cleared by
/// the lifecycle manager, not here.
pub async fn advance(
    conn: &mut SqliteConnection,
    owner_id: &str,
    plant_id: i64,
    trigger_date: DateTime<Utc>,
) -> Result<Option<FollowUp>, EngineError> {
    let trigger = db::get_plant(&mut *conn, owner_id, plant_id)
        .await?
        .ok_or_else(|| EngineError::not_found("plant", plant_id))?;

    let Some(order) = trigger.sequence_order else {
        return Ok(None);
    };

    let (target, scheduled_for, note, wrapped) =
        match db::next_in_rotation(&mut *conn, owner_id, order).await? {
            Some(next) => (next, trigger_date + Duration::days(7), AUTO_SCHEDULED_NOTE, false),
            None => {
                let Some(first) = db::first_in_rotation(&mut *conn, owner_id).await? else {
                    return Ok(None);
                };
                let scheduled = trigger_date
                    .checked_add_months(Months::new(1))
                    .ok_or_else(|| {
                        EngineError::InvalidArgument("trigger date out of range".to_string())
                    })?;
                (first, scheduled, CYCLE_RESTART_NOTE, true)
            }
        };

    if db::pending_visit_for_plant(&mut *conn, target.id)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    let now = Utc::now();
    db::set_next_maintenance_date(&mut *conn, target.id, Some(scheduled_for), now).await?;
    let visit_id = db::insert_visit(
        &mut *conn,
        &db::NewVisit {
            plant_id: target.id,
            owner_id,
            start_date: scheduled_for,
            end_date: None,
            notes: note,
        },
        now,
    )
    .await?;

    tracing::debug!(
        owner = owner_id,
        trigger = plant_id,
        target = target.id,
        wrapped,
        "rotation advanced"
    );

    Ok(Some(FollowUp {
        plant_id: target.id,
        visit_id,
        scheduled_for,
        wrapped,
    }))
}

/// Register a plant at the end of the owner's rotation
pub async fn register_plant(
    pool: &SqlitePool,
    owner_id: &str,
    req: CreatePlantRequest,
) -> Result<i64, EngineError> {
    let name = req
        .name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| EngineError::InvalidArgument("name is required".to_string()))?;
    let address = req
        .address
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| EngineError::InvalidArgument("address is required".to_string()))?;
    let latitude = req
        .latitude
        .ok_or_else(|| EngineError::InvalidArgument("latitude is required".to_string()))?;
    let longitude = req
        .longitude
        .ok_or_else(|| EngineError::InvalidArgument("longitude is required".to_string()))?;

    let mut tx = pool.begin().await?;
    let order = db::max_sequence_order(&mut *tx, owner_id).await?.unwrap_or(0) + 1;
    let plant_id = db::insert_plant(
        &mut *tx,
        owner_id,
        &name,
        &address,
        latitude,
        longitude,
        order,
        Utc::now(),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(owner = owner_id, plant = plant_id, order, "plant registered");
    Ok(plant_id)
}

/// Delete a plant and re-compact the survivors' orders to a contiguous 1..N
/// sequence in existing order, all in one transaction
pub async fn remove_plant(
    pool: &SqlitePool,
    owner_id: &str,
    plant_id: i64,
) -> Result<(), EngineError> {
    let mut tx = pool.begin().await?;

    if !db::delete_plant(&mut *tx, owner_id, plant_id).await? {
        return Err(EngineError::not_found("plant", plant_id));
    }
    compact_orders(&mut tx, owner_id).await?;

    tx.commit().await?;
    tracing::info!(owner = owner_id, plant = plant_id, "plant removed");
    Ok(())
}

/// Renumber an owner's sequenced plants to contiguous 1..N.
///
/// Processing in ascending order only ever moves a plant to a position at or
/// below its current one, so the per-owner unique index is never violated
/// mid-loop.
async fn compact_orders(conn: &mut SqliteConnection, owner_id: &str) -> Result<(), EngineError> {
    let plants = db::sequenced_plants(&mut *conn, owner_id).await?;
    let now = Utc::now();

    for (idx, plant) in plants.iter().enumerate() {
        let target = idx as i64 + 1;
        if plant.sequence_order != Some(target) {
            db::set_sequence_order(&mut *conn, plant.id, target, now).await?;
        }
    }

    Ok(())
}
