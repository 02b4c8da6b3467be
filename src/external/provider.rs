use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CompanyRecord, PricePoint};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("not found")]
    NotFound,
}

/// History window, in the range grammar the quote providers speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    /// First trading day of the calendar year to the present.
    Ytd,
    OneMonth,
    SixMonths,
    OneYear,
}

impl HistoryRange {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryRange::Ytd => "ytd",
            HistoryRange::OneMonth => "1mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
        }
    }
}

/// Sampling interval of the requested series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Daily,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

/// Source of the index constituents table.
#[async_trait]
pub trait ConstituentProvider: Send + Sync {
    async fn fetch_constituents(&self) -> Result<Vec<CompanyRecord>, ProviderError>;
}

/// Source of historical daily quotes for a single symbol.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        range: HistoryRange,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, ProviderError>;
}
