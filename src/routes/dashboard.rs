use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::DashboardView;
use crate::routes::companies::SectorParams;
use crate::services::dashboard;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<SectorParams>,
) -> Result<Json<DashboardView>, AppError> {
    info!("GET /dashboard - full render pass");
    let view = dashboard::build_dashboard(&state, params.selection())
        .await
        .map_err(|e| {
            error!("dashboard render failed: {}", e);
            e
        })?;
    Ok(Json(view))
}
