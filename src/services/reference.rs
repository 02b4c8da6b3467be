use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::external::provider::ConstituentProvider;
use crate::models::CompanyRecord;

/// Process-wide memo of the constituents table.
///
/// Reads share one `Arc` snapshot. A miss takes the refresh lock, re-checks
/// the slot and performs the single outbound fetch; concurrent callers block
/// on the same lock and pick up the freshly populated slot instead of
/// issuing duplicate fetches. Invalidation is manual only.
#[derive(Clone)]
pub struct ReferenceCache {
    provider: Arc<dyn ConstituentProvider>,
    slot: Arc<RwLock<Option<Arc<Vec<CompanyRecord>>>>>,
    refresh: Arc<Mutex<()>>,
}

impl ReferenceCache {
    pub fn new(provider: Arc<dyn ConstituentProvider>) -> Self {
        Self {
            provider,
            slot: Arc::new(RwLock::new(None)),
            refresh: Arc::new(Mutex::new(())),
        }
    }

    pub async fn get_or_load(&self) -> Result<Arc<Vec<CompanyRecord>>, AppError> {
        if let Some(table) = self.slot.read().clone() {
            return Ok(table);
        }

        let _guard = self.refresh.lock().await;
        if let Some(table) = self.slot.read().clone() {
            // populated while we waited on the refresh lock
            return Ok(table);
        }

        info!("constituent table not cached, fetching");
        let records = self.provider.fetch_constituents().await?;
        info!("cached {} constituent rows", records.len());

        let table = Arc::new(records);
        *self.slot.write() = Some(table.clone());
        Ok(table)
    }

    /// Drop the cached table; the next read fetches again.
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }
}
