use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar. A symbol's series is ordered ascending by date with
/// no duplicate dates; the provider enforces this before handing data out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}
