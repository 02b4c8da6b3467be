use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Why a symbol's last price fetch failed. Each kind carries its own
/// backoff window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Symbol unknown to the provider (delisted, renamed)
    NotFound,
    RateLimited,
    /// Any other upstream error
    Upstream,
}

impl FailureKind {
    fn backoff(self) -> Duration {
        match self {
            FailureKind::NotFound => Duration::hours(12),
            FailureKind::RateLimited => Duration::minutes(15),
            FailureKind::Upstream => Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone)]
struct Failure {
    kind: FailureKind,
    recorded_at: DateTime<Utc>,
}

/// Remembers symbols whose price fetch recently failed so a render pass does
/// not repeat requests that are known to fail. Thread-safe, shared across
/// handlers.
#[derive(Clone)]
pub struct FailureCache {
    entries: Arc<DashMap<String, Failure>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Returns the failure kind while `symbol` is still inside its backoff
    /// window; expired entries are evicted on the way out.
    pub fn should_skip(&self, symbol: &str) -> Option<FailureKind> {
        let entry = self.entries.get(symbol)?;
        let failure = entry.value().clone();
        if Utc::now() < failure.recorded_at + failure.kind.backoff() {
            return Some(failure.kind);
        }
        drop(entry); // release the shard lock before removing
        self.entries.remove(symbol);
        None
    }

    pub fn record(&self, symbol: &str, kind: FailureKind) {
        self.entries.insert(
            symbol.to_string(),
            Failure {
                kind,
                recorded_at: Utc::now(),
            },
        );
    }

    /// Forget a symbol, e.g. after a successful fetch.
    pub fn clear(&self, symbol: &str) {
        self.entries.remove(symbol);
    }
}

impl Default for FailureCache {
    fn default() -> Self {
        Self::new()
    }
}
