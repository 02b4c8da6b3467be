use tracing::info;

use crate::errors::AppError;
use crate::external::provider::{HistoryRange, Interval};
use crate::models::{
    ChartPoint, ChartSeries, CompanyTableView, DashboardView, DescriptorEntry, PricePoint,
    SymbolPanel,
};
use crate::services::{prices, returns, sector};
use crate::state::AppState;

/// Route serving the CSV artifact; the frontend wires this into its
/// download link.
pub const EXPORT_PATH: &str = "/api/companies/export";

pub const CHART_X_LABEL: &str = "Date";
pub const CHART_Y_LABEL: &str = "Closing Price";
/// Date ticks overlap horizontally, so the frontend draws them vertical.
pub const CHART_X_LABEL_ROTATION: u16 = 90;

pub const UNAVAILABLE_DISPLAY: &str = "N/A";

/// One full render pass: reference table, sector filter, export link, price
/// history, per-symbol panels, in that order. `selected: None` means the
/// caller picked nothing and gets the default selection.
pub async fn build_dashboard(
    state: &AppState,
    selected: Option<Vec<String>>,
) -> Result<DashboardView, AppError> {
    let table = state.reference.get_or_load().await?;
    let sectors = sector::distinct_sectors(&table);
    let selected = selected.unwrap_or_else(|| sector::default_selection(&sectors));
    let filtered = sector::filter_by_sector(&table, &selected);
    info!(
        "dashboard pass: {} of {} companies across {} selected sectors",
        filtered.len(),
        table.len(),
        selected.len()
    );

    let tracked = state.descriptors.symbols();
    let series = prices::fetch_price_series(
        state.price_provider.as_ref(),
        &state.price_failures,
        &tracked,
        HistoryRange::Ytd,
        Interval::Daily,
    )
    .await?;

    let panels = state
        .descriptors
        .entries()
        .iter()
        .map(|d| build_panel(d, series.get(&d.symbol).map(|s| s.as_slice())))
        .collect();

    Ok(DashboardView {
        sectors,
        selected_sectors: selected,
        companies: CompanyTableView::new(filtered),
        export_path: EXPORT_PATH.to_string(),
        panels,
    })
}

/// Panel for one tracked symbol. A missing or empty series renders a
/// placeholder panel instead of failing the whole page; a degenerate series
/// keeps its chart but shows "N/A" for the return.
pub fn build_panel(descriptor: &DescriptorEntry, series: Option<&[PricePoint]>) -> SymbolPanel {
    let Some(series) = series.filter(|s| !s.is_empty()) else {
        return SymbolPanel {
            symbol: descriptor.symbol.clone(),
            title: descriptor.title.clone(),
            description: descriptor.description.clone(),
            available: false,
            chart: None,
            ytd_return_pct: None,
            ytd_display: UNAVAILABLE_DISPLAY.to_string(),
        };
    };

    let chart = ChartSeries {
        title: descriptor.symbol.clone(),
        x_label: CHART_X_LABEL.to_string(),
        y_label: CHART_Y_LABEL.to_string(),
        x_label_rotation: CHART_X_LABEL_ROTATION,
        points: series
            .iter()
            .map(|p| ChartPoint {
                date: p.date,
                close: p.close,
            })
            .collect(),
    };

    let (ytd_return_pct, ytd_display) = match returns::ytd_return(series) {
        Ok(pct) => (Some(returns::round_pct(pct)), returns::format_pct(pct)),
        Err(_) => (None, UNAVAILABLE_DISPLAY.to_string()),
    };

    SymbolPanel {
        symbol: descriptor.symbol.clone(),
        title: descriptor.title.clone(),
        description: descriptor.description.clone(),
        available: true,
        chart: Some(chart),
        ytd_return_pct,
        ytd_display,
    }
}
