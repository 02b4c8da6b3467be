use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{CompanyRecord, CompanyTableView};
use crate::services::{export, sector};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies))
        .route("/sectors", get(list_sectors))
        .route("/export", get(export_csv))
        .route("/refresh", post(refresh))
}

/// Sector selection carried in the query string.
///
/// Absent means "no explicit choice" and yields the default selection;
/// `?sectors=` (present but empty) is a deliberate empty selection and
/// yields an empty table.
#[derive(Debug, Deserialize)]
pub struct SectorParams {
    pub sectors: Option<String>,
}

impl SectorParams {
    pub fn selection(&self) -> Option<Vec<String>> {
        self.sectors.as_ref().map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }
}

async fn filtered_table(
    state: &AppState,
    params: &SectorParams,
) -> Result<Vec<CompanyRecord>, AppError> {
    let table = state.reference.get_or_load().await?;
    let selected = params.selection().unwrap_or_else(|| {
        let sectors = sector::distinct_sectors(&table);
        sector::default_selection(&sectors)
    });
    Ok(sector::filter_by_sector(&table, &selected))
}

pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<SectorParams>,
) -> Result<Json<CompanyTableView>, AppError> {
    info!("GET /companies - listing constituents");
    let rows = filtered_table(&state, &params).await.map_err(|e| {
        error!("failed to list constituents: {}", e);
        e
    })?;
    Ok(Json(CompanyTableView::new(rows)))
}

pub async fn list_sectors(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /companies/sectors - listing sectors");
    let table = state.reference.get_or_load().await.map_err(|e| {
        error!("failed to load constituents: {}", e);
        e
    })?;
    Ok(Json(sector::distinct_sectors(&table)))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<SectorParams>,
) -> Result<impl IntoResponse, AppError> {
    info!("GET /companies/export - exporting CSV");
    let rows = filtered_table(&state, &params).await?;
    let bytes = export::to_csv(&rows).map_err(|e| {
        error!("CSV export failed: {}", e);
        e
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME);
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|e| AppError::Encoding(e.to_string()))?,
    );
    Ok((StatusCode::OK, headers, bytes))
}

pub async fn refresh(State(state): State<AppState>) -> StatusCode {
    info!("POST /companies/refresh - invalidating constituent cache");
    state.reference.invalidate();
    StatusCode::NO_CONTENT
}
