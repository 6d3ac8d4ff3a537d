//! Maintenance visit API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;

use crate::db;
use crate::domain::{
    AttachRouteRequest, CreateVisitRequest, PlantSummary, ReportItemsRequest, SetStartDateRequest,
    VisitDetail,
};
use crate::engine::{lifecycle, tracker};

use super::{ApiResponse, AppError, AppState, OwnerId};

/// Create visit routes
pub fn visit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_visits).post(create_visit))
        .route("/:visit_id", get(get_visit))
        .route("/:visit_id/complete", post(complete_visit))
        .route("/:visit_id/start-date", patch(set_start_date))
        .route("/:visit_id/route", post(attach_route))
        .route("/:visit_id/checklist", post(report_checklist))
}

#[derive(Debug, Serialize)]
struct CreatedVisit {
    id: i64,
}

#[derive(Debug, Serialize)]
struct ChecklistReport {
    count: usize,
}

async fn visit_detail(
    state: &AppState,
    owner_id: &str,
    visit: crate::domain::MaintenanceVisit,
) -> Result<Option<VisitDetail>, AppError> {
    let Some(plant) = db::get_plant(&state.pool, owner_id, visit.plant_id).await? else {
        return Ok(None);
    };
    let completed_items = db::list_completed_items(&state.pool, visit.id).await?;

    Ok(Some(VisitDetail {
        visit,
        plant: PlantSummary {
            id: plant.id,
            name: plant.name,
            address: plant.address,
        },
        completed_items,
    }))
}

async fn list_visits(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<ApiResponse<Vec<VisitDetail>>>, AppError> {
    let visits = db::list_visits(&state.pool, &owner_id).await?;

    let mut details = Vec::with_capacity(visits.len());
    for visit in visits {
        if let Some(detail) = visit_detail(&state, &owner_id, visit).await? {
            details.push(detail);
        }
    }

    Ok(Json(ApiResponse::new(details)))
}

async fn create_visit(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(req): Json<CreateVisitRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedVisit>>), AppError> {
    let id = lifecycle::create_visit(&state.pool, &owner_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(CreatedVisit { id }))))
}

async fn get_visit(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(visit_id): Path<i64>,
) -> Result<Json<ApiResponse<VisitDetail>>, AppError> {
    let visit = db::get_visit(&state.pool, &owner_id, visit_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("visit {} not found", visit_id)))?;

    let detail = visit_detail(&state, &owner_id, visit)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("visit {} not found", visit_id)))?;

    Ok(Json(ApiResponse::new(detail)))
}

async fn complete_visit(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(visit_id): Path<i64>,
) -> Result<Json<ApiResponse<CreatedVisit>>, AppError> {
    let id = lifecycle::complete_visit(&state.pool, &owner_id, visit_id).await?;
    Ok(Json(ApiResponse::new(CreatedVisit { id })))
}

async fn set_start_date(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(visit_id): Path<i64>,
    Json(req): Json<SetStartDateRequest>,
) -> Result<StatusCode, AppError> {
    lifecycle::set_start_date(&state.pool, &owner_id, visit_id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn attach_route(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(visit_id): Path<i64>,
    Json(req): Json<AttachRouteRequest>,
) -> Result<StatusCode, AppError> {
    lifecycle::attach_route(&state.pool, &owner_id, visit_id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn report_checklist(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(visit_id): Path<i64>,
    Json(req): Json<ReportItemsRequest>,
) -> Result<Json<ApiResponse<ChecklistReport>>, AppError> {
    let count = tracker::report_items(&state.pool, &owner_id, visit_id, req).await?;
    Ok(Json(ApiResponse::new(ChecklistReport { count })))
}
