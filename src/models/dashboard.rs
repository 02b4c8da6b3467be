use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::company::{CompanyRecord, COLUMN_NAMES};

/// A single point on a closing-price chart. The backend computes these; the
/// frontend just draws them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Line-chart payload for one symbol: closing price over the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Degrees to rotate the x tick labels (dates overlap otherwise).
    pub x_label_rotation: u16,
    pub points: Vec<ChartPoint>,
}

/// One dashboard panel: chart, year-to-date return and descriptive text for
/// a tracked symbol. `available: false` means the price fetch came back
/// empty for this symbol and the panel renders a placeholder instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolPanel {
    pub symbol: String,
    pub title: String,
    pub description: String,
    pub available: bool,
    pub chart: Option<ChartSeries>,
    pub ytd_return_pct: Option<f64>,
    pub ytd_display: String,
}

/// Filtered constituents table plus its dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyTableView {
    pub row_count: usize,
    pub column_count: usize,
    pub rows: Vec<CompanyRecord>,
}

impl CompanyTableView {
    pub fn new(rows: Vec<CompanyRecord>) -> Self {
        Self {
            row_count: rows.len(),
            column_count: COLUMN_NAMES.len(),
            rows,
        }
    }
}

/// The complete dashboard document produced by one render pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub sectors: Vec<String>,
    pub selected_sectors: Vec<String>,
    pub companies: CompanyTableView,
    pub export_path: String,
    pub panels: Vec<SymbolPanel>,
}
