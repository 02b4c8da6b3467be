use async_trait::async_trait;
use serde::Deserialize;

use crate::external::provider::{HistoryRange, Interval, PriceProvider, ProviderError};
use crate::models::PricePoint;

/// Yahoo Finance v8 chart API client. Free, no API key; adjusted closes are
/// requested so splits and dividends do not distort the window.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; Sp500Dashboard/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

// Minimal response envelope (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Timestamps align with the indicator arrays by index. Bars with a null
/// close (market holidays) are skipped; output is ascending and deduped by
/// date.
fn points_from_chart(result: &ChartResult) -> Result<Vec<PricePoint>, ProviderError> {
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| ProviderError::BadResponse("no quote data in response".into()))?;

    if quote.close.len() != result.timestamp.len() {
        return Err(ProviderError::Parse(
            "timestamp and close arrays differ in length".into(),
        ));
    }

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let Some(date) = chrono::DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        let ohlc = |values: &Vec<Option<f64>>| values.get(i).copied().flatten().unwrap_or(close);
        points.push(PricePoint {
            date,
            open: ohlc(&quote.open),
            high: ohlc(&quote.high),
            low: ohlc(&quote.low),
            close,
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
    Ok(points)
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        range: HistoryRange,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let url = format!("https://query1.finance.yahoo.com/v8/finance/chart/{}", symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", range.as_str()),
                ("interval", interval.as_str()),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if resp.status().as_u16() == 404 {
            return Err(ProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(error) = body.chart.error {
            if error.description.contains("No data found") {
                return Err(ProviderError::NotFound);
            }
            return Err(ProviderError::BadResponse(error.description));
        }

        let results = body
            .chart
            .result
            .ok_or_else(|| ProviderError::BadResponse("no results in response".into()))?;
        let result = results.first().ok_or(ProviderError::NotFound)?;

        let points = points_from_chart(result)?;
        if points.is_empty() {
            return Err(ProviderError::NotFound);
        }
        Ok(points)
    }
}
