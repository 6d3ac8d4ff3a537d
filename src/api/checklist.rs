//! Checklist catalog API routes

use axum::{extract::State, routing::get, Json, Router};

use crate::domain::ChecklistItem;
use crate::engine::catalog;

use super::{ApiResponse, AppError, AppState, OwnerId};

/// Create checklist catalog routes
pub fn checklist_routes() -> Router<AppState> {
    Router::new().route("/", get(list_checklist))
}

async fn list_checklist(
    State(state): State<AppState>,
    OwnerId(_owner_id): OwnerId,
) -> Result<Json<ApiResponse<Vec<ChecklistItem>>>, AppError> {
    let items = catalog::list_or_seed(&state.pool).await?;
    Ok(Json(ApiResponse::new(items)))
}
