use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use tower::ServiceExt;

use sp500_dashboard_backend::app::create_app;
use sp500_dashboard_backend::external::provider::{
    ConstituentProvider, HistoryRange, Interval, PriceProvider, ProviderError,
};
use sp500_dashboard_backend::models::{
    CompanyRecord, CompanyTableView, DashboardView, DescriptorSet, PricePoint,
};
use sp500_dashboard_backend::services::failure_cache::FailureCache;
use sp500_dashboard_backend::services::reference::ReferenceCache;
use sp500_dashboard_backend::state::AppState;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const TRACKED: [&str; 10] = [
    "AAPL", "MSFT", "AMZN", "FB", "GOOGL", "GOOG", "TSLA", "BRK-B", "JPM", "JNJ",
];

fn company(symbol: &str, security: &str, sector: &str) -> CompanyRecord {
    CompanyRecord {
        symbol: symbol.into(),
        security: security.into(),
        gics_sector: sector.into(),
        gics_sub_industry: "Sub-Industry".into(),
        headquarters: "Somewhere, USA".into(),
        date_added: "1999-01-01".into(),
        cik: "0000000001".into(),
        founded: "1900".into(),
    }
}

/// Five sectors, sorted: Consumer Staples, Energy, Financials, Health Care,
/// Industrials. The default selection (fourth from the end) is Energy.
fn reference_table() -> Vec<CompanyRecord> {
    vec![
        company("XOM", "Exxon Mobil", "Energy"),
        company("PG", "Procter & Gamble", "Consumer Staples"),
        company("JPM", "JPMorgan Chase & Co.", "Financials"),
        company("CVX", "Chevron", "Energy"),
        company("JNJ", "Johnson & Johnson", "Health Care"),
        company("MMM", "3M", "Industrials"),
    ]
}

struct FixtureConstituents {
    calls: AtomicUsize,
}

impl FixtureConstituents {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ConstituentProvider for FixtureConstituents {
    async fn fetch_constituents(&self) -> Result<Vec<CompanyRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(reference_table())
    }
}

/// Serves every tracked symbol except the ones listed as missing.
struct FixturePrices {
    missing: Vec<&'static str>,
}

#[async_trait]
impl PriceProvider for FixturePrices {
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        _range: HistoryRange,
        _interval: Interval,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        if self.missing.iter().any(|m| *m == symbol) {
            return Err(ProviderError::NotFound);
        }
        let bar = |day: u32, close: f64| PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(1_000),
        };
        Ok(vec![bar(2, 100.0), bar(3, 110.0), bar(4, 90.0)])
    }
}

fn descriptors() -> DescriptorSet {
    let entries: Vec<serde_json::Value> = TRACKED
        .iter()
        .map(|symbol| {
            serde_json::json!({
                "symbol": symbol,
                "title": format!("{symbol} Title"),
                "description": format!("{symbol} blurb."),
            })
        })
        .collect();
    DescriptorSet::from_json(&serde_json::to_string(&entries).unwrap()).unwrap()
}

fn state_with(
    constituents: Arc<FixtureConstituents>,
    missing_prices: Vec<&'static str>,
) -> AppState {
    AppState {
        reference: ReferenceCache::new(constituents),
        price_provider: Arc::new(FixturePrices {
            missing: missing_prices,
        }),
        price_failures: FailureCache::new(),
        descriptors: Arc::new(descriptors()),
    }
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_renders_all_panels_despite_a_missing_symbol() {
    let app = create_app(state_with(FixtureConstituents::new(), vec!["TSLA"]));

    let (status, body) = get(&app, "/api/dashboard?sectors=Energy").await;
    assert_eq!(status, StatusCode::OK);

    let view: DashboardView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.panels.len(), TRACKED.len());

    let rendered: Vec<&str> = view
        .panels
        .iter()
        .map(|p| p.symbol.as_str())
        .collect();
    assert_eq!(rendered, TRACKED.to_vec());

    for panel in &view.panels {
        if panel.symbol == "TSLA" {
            assert!(!panel.available);
            assert!(panel.chart.is_none());
            assert_eq!(panel.ytd_display, "N/A");
        } else {
            assert!(panel.available, "panel {} should render", panel.symbol);
            let chart = panel.chart.as_ref().unwrap();
            assert_eq!(chart.title, panel.symbol);
            assert_eq!(chart.points.len(), 3);
            assert_eq!(panel.ytd_return_pct, Some(-10.0));
            assert_eq!(panel.ytd_display, "-10.00%");
        }
    }
}

#[tokio::test]
async fn dashboard_defaults_to_the_fourth_sector_from_the_end() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    let view: DashboardView = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        view.sectors,
        vec![
            "Consumer Staples",
            "Energy",
            "Financials",
            "Health Care",
            "Industrials"
        ]
    );
    assert_eq!(view.selected_sectors, vec!["Energy"]);
    assert_eq!(view.companies.row_count, 2);
    assert_eq!(view.companies.rows[0].symbol, "XOM");
    assert_eq!(view.companies.rows[1].symbol, "CVX");
    assert_eq!(view.export_path, "/api/companies/export");
}

#[tokio::test]
async fn dashboard_with_empty_selection_has_no_companies_but_full_panels() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/dashboard?sectors=").await;
    assert_eq!(status, StatusCode::OK);

    let view: DashboardView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.companies.row_count, 0);
    assert_eq!(view.panels.len(), TRACKED.len());
}

// ---------------------------------------------------------------------------
// Companies & export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn companies_filter_is_applied_and_dimensions_reported() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/companies?sectors=Energy,Financials").await;
    assert_eq!(status, StatusCode::OK);

    let view: CompanyTableView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.row_count, 3);
    assert_eq!(view.column_count, 8);
    let symbols: Vec<&str> = view.rows.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["XOM", "JPM", "CVX"]);
}

#[tokio::test]
async fn sectors_are_listed_sorted() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/companies/sectors").await;
    assert_eq!(status, StatusCode::OK);

    let sectors: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(sectors.first().map(String::as_str), Some("Consumer Staples"));
    assert_eq!(sectors.len(), 5);
}

#[tokio::test]
async fn export_is_a_csv_attachment_named_sp500() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/companies/export?sectors=Energy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("SP500.csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let mut reader = csv::Reader::from_reader(bytes.as_ref());
    assert_eq!(reader.headers().unwrap().len(), 8);
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "XOM");
}

#[tokio::test]
async fn reference_data_is_fetched_once_until_invalidated() {
    let constituents = FixtureConstituents::new();
    let app = create_app(state_with(constituents.clone(), vec![]));

    let (first, _) = get(&app, "/api/companies?sectors=Energy").await;
    let (second, _) = get(&app, "/api/companies/sectors").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(constituents.calls.load(Ordering::SeqCst), 1);

    let refresh = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/companies/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(refresh.status(), StatusCode::NO_CONTENT);

    let (third, _) = get(&app, "/api/companies/sectors").await;
    assert_eq!(third, StatusCode::OK);
    assert_eq!(constituents.calls.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn price_series_is_served_for_tracked_symbols() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/prices/AAPL").await;
    assert_eq!(status, StatusCode::OK);

    let series: Vec<PricePoint> = serde_json::from_slice(&body).unwrap();
    assert_eq!(series.len(), 3);
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn untracked_symbol_is_not_found() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, _) = get(&app, "/api/prices/ZZZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ytd_route_reports_the_formula_result() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/prices/MSFT/ytd").await;
    assert_eq!(status, StatusCode::OK);

    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["symbol"], "MSFT");
    assert_eq!(payload["ytd_return_pct"], -10.0);
    assert_eq!(payload["display"], "-10.00%");
}

#[tokio::test]
async fn health_is_alive() {
    let app = create_app(state_with(FixtureConstituents::new(), vec![]));

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
