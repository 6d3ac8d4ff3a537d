//! Plant API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use crate::db;
use crate::domain::{CreatePlantRequest, MaintenanceVisit, Plant, UpdatePlantRequest};
use crate::engine::sequencer;

use super::{ApiResponse, AppError, AppState, OwnerId};

/// Create plant routes
pub fn plant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plants).post(create_plant))
        .route(
            "/:plant_id",
            get(get_plant).patch(update_plant).delete(delete_plant),
        )
        .route("/:plant_id/next-visit", get(next_visit))
}

#[derive(Debug, Serialize)]
struct CreatedPlant {
    id: i64,
}

async fn list_plants(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<ApiResponse<Vec<Plant>>>, AppError> {
    let plants = db::list_plants(&state.pool, &owner_id).await?;
    Ok(Json(ApiResponse::new(plants)))
}

async fn create_plant(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(req): Json<CreatePlantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedPlant>>), AppError> {
    let id = sequencer::register_plant(&state.pool, &owner_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(CreatedPlant { id }))))
}

async fn get_plant(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(plant_id): Path<i64>,
) -> Result<Json<ApiResponse<Plant>>, AppError> {
    let plant = db::get_plant(&state.pool, &owner_id, plant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plant {} not found", plant_id)))?;
    Ok(Json(ApiResponse::new(plant)))
}

async fn update_plant(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(plant_id): Path<i64>,
    Json(req): Json<UpdatePlantRequest>,
) -> Result<Json<ApiResponse<Plant>>, AppError> {
    let mut plant = db::get_plant(&state.pool, &owner_id, plant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plant {} not found", plant_id)))?;

    if let Some(name) = req.name {
        plant.name = name;
    }
    if let Some(address) = req.address {
        plant.address = address;
    }
    if let Some(latitude) = req.latitude {
        plant.latitude = latitude;
    }
    if let Some(longitude) = req.longitude {
        plant.longitude = longitude;
    }

    db::update_plant_fields(&state.pool, &owner_id, plant_id, &plant, Utc::now()).await?;
    Ok(Json(ApiResponse::new(plant)))
}

async fn delete_plant(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(plant_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    sequencer::remove_plant(&state.pool, &owner_id, plant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn next_visit(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(plant_id): Path<i64>,
) -> Result<Json<ApiResponse<MaintenanceVisit>>, AppError> {
    db::get_plant(&state.pool, &owner_id, plant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plant {} not found", plant_id)))?;

    let visit = db::next_scheduled_for_plant(&state.pool, &owner_id, plant_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("no scheduled visit".to_string()))?;

    Ok(Json(ApiResponse::new(visit)))
}
