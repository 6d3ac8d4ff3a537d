//! Maintenance lifecycle manager
//!
//! Owns the visit state machine (`Scheduled -> Completed`) and the atomic
//! multi-entity transition on creation and completion. All mutating steps of
//! `create_visit` and `complete_visit` run in a single transaction; a failure
//! anywhere rolls the whole transition back.

use chrono::{DateTime, Duration, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db;
use crate::domain::{AttachRouteRequest, CreateVisitRequest, EngineError, SetStartDateRequest};
use crate::engine::sequencer::{self, AUTO_SCHEDULED_NOTE};

/// Schedule a visit for a plant and drive the rotation forward.
///
/// The plant's `last_maintenance_date` moves to the visit's effective date
/// (end date when recorded as already completed, start date otherwise) and
/// its `next_maintenance_date` is cleared. The first visit ever recorded for
/// an owner seeds follow-ups for every other sequenced plant at weekly
/// intervals; afterwards each visit triggers a single rotation step.
pub async fn create_visit(
    pool: &SqlitePool,
    owner_id: &str,
    req: CreateVisitRequest,
) -> Result<i64, EngineError> {
    let plant_id = req
        .plant_id
        .ok_or_else(|| EngineError::InvalidArgument("plantId is required".to_string()))?;
    let start_date = req
        .start_date
        .ok_or_else(|| EngineError::InvalidArgument("startDate is required".to_string()))?;
    let notes = req.notes.unwrap_or_default();

    let mut tx = pool.begin().await?;

    db::get_plant(&mut *tx, owner_id, plant_id)
        .await?
        .ok_or_else(|| EngineError::not_found("plant", plant_id))?;

    if req.end_date.is_none()
        && db::pending_visit_for_plant(&mut *tx, plant_id).await?.is_some()
    {
        return Err(EngineError::InvalidArgument(
            "plant already has a pending visit".to_string(),
        ));
    }

    let first_ever = db::count_visits_for_owner(&mut *tx, owner_id).await? == 0;
    let now = Utc::now();

    let visit_id = db::insert_visit(
        &mut *tx,
        &db::NewVisit {
            plant_id,
            owner_id,
            start_date,
            end_date: req.end_date,
            notes: &notes,
        },
        now,
    )
    .await?;

    for entry in &req.checklist {
        let completed_at = entry.completed.then_some(now);
        db::insert_completed_item(
            &mut *tx,
            visit_id,
            entry.checklist_item_id,
            entry.completed,
            entry.notes.as_deref().unwrap_or(""),
            completed_at,
        )
        .await?;
    }

    let effective_date = req.end_date.unwrap_or(start_date);
    db::set_maintenance_dates(&mut *tx, plant_id, Some(effective_date), None, now).await?;

    if first_ever {
        seed_initial_rotation(&mut tx, owner_id, plant_id, start_date).await?;
    } else {
        sequencer::advance(&mut tx, owner_id, plant_id, start_date).await?;
    }

    tx.commit().await?;
    tracing::info!(owner = owner_id, plant = plant_id, visit = visit_id, "visit created");
    Ok(visit_id)
}

/// Seed a follow-up for every other sequenced plant at weekly intervals from
/// the first visit's start date, in rotation order.
async fn seed_initial_rotation(
    conn: &mut SqliteConnection,
    owner_id: &str,
    trigger_plant_id: i64,
    start_date: DateTime<Utc>,
) -> Result<(), EngineError> {
    let others: Vec<_> = db::sequenced_plants(&mut *conn, owner_id)
        .await?
        .into_iter()
        .filter(|p| p.id != trigger_plant_id)
        .collect();

    let now = Utc::now();
    for (idx, plant) in others.iter().enumerate() {
        if db::pending_visit_for_plant(&mut *conn, plant.id).await?.is_some() {
            continue;
        }
        let scheduled_for = start_date + Duration::days(7 * (idx as i64 + 1));
        db::set_next_maintenance_date(&mut *conn, plant.id, Some(scheduled_for), now).await?;
        db::insert_visit(
            &mut *conn,
            &db::NewVisit {
                plant_id: plant.id,
                owner_id,
                start_date: scheduled_for,
                end_date: None,
                notes: AUTO_SCHEDULED_NOTE,
            },
            now,
        )
        .await?;
    }

    Ok(())
}

/// Complete a visit and advance the owner's rotation in one transaction
pub async fn complete_visit(
    pool: &SqlitePool,
    owner_id: &str,
    visit_id: i64,
) -> Result<i64, EngineError> {
    let mut tx = pool.begin().await?;

    let visit = db::get_visit(&mut *tx, owner_id, visit_id)
        .await?
        .ok_or_else(|| EngineError::not_found("visit", visit_id))?;

    if !visit.state().can_complete() {
        return Err(EngineError::InvalidArgument(format!(
            "visit {} is already {}",
            visit_id,
            visit.state()
        )));
    }

    let now = Utc::now();
    db::mark_visit_completed(&mut *tx, visit_id, now).await?;
    db::set_maintenance_dates(&mut *tx, visit.plant_id, Some(now), None, now).await?;
    sequencer::advance(&mut tx, owner_id, visit.plant_id, now).await?;

    tx.commit().await?;
    tracing::info!(owner = owner_id, visit = visit_id, "visit completed");
    Ok(visit_id)
}

/// Move a visit's start date; no cascading effect on the rotation
pub async fn set_start_date(
    pool: &SqlitePool,
    owner_id: &str,
    visit_id: i64,
    req: SetStartDateRequest,
) -> Result<(), EngineError> {
    let start_date = req
        .start_date
        .ok_or_else(|| EngineError::InvalidArgument("startDate is required".to_string()))?;

    db::get_visit(pool, owner_id, visit_id)
        .await?
        .ok_or_else(|| EngineError::not_found("visit", visit_id))?;

    db::update_start_date(pool, visit_id, start_date, Utc::now()).await?;
    Ok(())
}

/// Attach a route description and arrival time; no rotation effect
pub async fn attach_route(
    pool: &SqlitePool,
    owner_id: &str,
    visit_id: i64,
    req: AttachRouteRequest,
) -> Result<(), EngineError> {
    let route = req
        .route
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| EngineError::InvalidArgument("route is required".to_string()))?;

    db::get_visit(pool, owner_id, visit_id)
        .await?
        .ok_or_else(|| EngineError::not_found("visit", visit_id))?;

    db::update_route(pool, visit_id, &route, req.arrival_time, Utc::now()).await?;
    Ok(())
}
