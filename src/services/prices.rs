use std::collections::HashMap;

use futures::future::join_all;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::provider::{HistoryRange, Interval, PriceProvider, ProviderError};
use crate::models::PricePoint;
use crate::services::failure_cache::{FailureCache, FailureKind};

const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchFailure {
    RateLimited,
    Other,
}

/// Fetch daily history for every requested symbol in one batched pass.
///
/// Per-symbol requests run concurrently and resolve independently: a symbol
/// that fails (after bounded retry on rate limiting) is recorded in the
/// failure cache and omitted from the result map, so callers must tolerate
/// a missing key. The call as a whole errors only when every symbol came
/// back empty-handed.
pub async fn fetch_price_series(
    provider: &dyn PriceProvider,
    failures: &FailureCache,
    symbols: &[String],
    range: HistoryRange,
    interval: Interval,
) -> Result<HashMap<String, Vec<PricePoint>>, AppError> {
    let fetches = symbols
        .iter()
        .map(|symbol| fetch_one(provider, failures, symbol, range, interval));
    let outcomes = join_all(fetches).await;

    let mut series = HashMap::new();
    let mut failed = 0usize;
    let mut rate_limited = 0usize;
    for (symbol, outcome) in outcomes {
        match outcome {
            Ok(points) => {
                series.insert(symbol, points);
            }
            Err(FetchFailure::RateLimited) => {
                failed += 1;
                rate_limited += 1;
            }
            Err(FetchFailure::Other) => failed += 1,
        }
    }

    if series.is_empty() && failed > 0 {
        if rate_limited == failed {
            return Err(AppError::RateLimited);
        }
        return Err(AppError::DataSource(
            "price history unavailable for every requested symbol".into(),
        ));
    }

    info!(
        "price fetch complete: {} of {} symbols resolved",
        series.len(),
        symbols.len()
    );
    Ok(series)
}

async fn fetch_one(
    provider: &dyn PriceProvider,
    failures: &FailureCache,
    symbol: &str,
    range: HistoryRange,
    interval: Interval,
) -> (String, Result<Vec<PricePoint>, FetchFailure>) {
    if let Some(kind) = failures.should_skip(symbol) {
        info!("skipping price fetch for {symbol}: recent failure ({kind:?}) still cooling down");
        let failure = match kind {
            FailureKind::RateLimited => FetchFailure::RateLimited,
            _ => FetchFailure::Other,
        };
        return (symbol.to_string(), Err(failure));
    }

    let mut attempt = 0;
    loop {
        match provider.fetch_daily_history(symbol, range, interval).await {
            Ok(points) => {
                failures.clear(symbol);
                return (symbol.to_string(), Ok(points));
            }
            Err(ProviderError::RateLimited) if attempt + 1 < MAX_ATTEMPTS => {
                attempt += 1;
                let delay = retry_delay(attempt);
                warn!(
                    "rate limited fetching {symbol}, retrying in {}s (attempt {attempt}/{})",
                    delay.as_secs(),
                    MAX_ATTEMPTS - 1
                );
                sleep(delay).await;
            }
            Err(e) => {
                let kind = match &e {
                    ProviderError::RateLimited => FailureKind::RateLimited,
                    ProviderError::NotFound => FailureKind::NotFound,
                    _ => FailureKind::Upstream,
                };
                failures.record(symbol, kind);
                error!("failed to fetch price history for {symbol}: {e}");
                let failure = match kind {
                    FailureKind::RateLimited => FetchFailure::RateLimited,
                    _ => FetchFailure::Other,
                };
                return (symbol.to_string(), Err(failure));
            }
        }
    }
}

fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(2 * attempt as u64)
}
