use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::provider::{HistoryRange, Interval};
use crate::models::PricePoint;
use crate::services::{prices, returns};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_series))
        .route("/:symbol/ytd", get(get_ytd))
}

#[derive(Debug, Serialize)]
struct YtdReturnResponse {
    symbol: String,
    ytd_return_pct: f64,
    display: String,
}

pub async fn get_series(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PricePoint>>, AppError> {
    info!("GET /prices/{} - fetching YTD history", symbol);
    let series = fetch_tracked(&state, &symbol).await.map_err(|e| {
        error!("failed to fetch price history for {}: {}", symbol, e);
        e
    })?;
    Ok(Json(series))
}

async fn get_ytd(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<YtdReturnResponse>, AppError> {
    info!("GET /prices/{}/ytd - computing YTD return", symbol);
    let series = fetch_tracked(&state, &symbol).await?;
    let pct = returns::ytd_return(&series).map_err(|e| {
        warn!("YTD return undefined for {}: {}", symbol, e);
        e
    })?;
    Ok(Json(YtdReturnResponse {
        symbol,
        ytd_return_pct: returns::round_pct(pct),
        display: returns::format_pct(pct),
    }))
}

async fn fetch_tracked(state: &AppState, symbol: &str) -> Result<Vec<PricePoint>, AppError> {
    if !state.descriptors.contains(symbol) {
        return Err(AppError::NotFound(format!(
            "{symbol} is not a tracked symbol"
        )));
    }

    let requested = vec![symbol.to_string()];
    let mut series = prices::fetch_price_series(
        state.price_provider.as_ref(),
        &state.price_failures,
        &requested,
        HistoryRange::Ytd,
        Interval::Daily,
    )
    .await?;

    series
        .remove(symbol)
        .ok_or_else(|| AppError::DataSource(format!("no price history for {symbol}")))
}
