use std::sync::Arc;

use crate::external::provider::PriceProvider;
use crate::models::DescriptorSet;
use crate::services::failure_cache::FailureCache;
use crate::services::reference::ReferenceCache;

#[derive(Clone)]
pub struct AppState {
    pub reference: ReferenceCache,
    pub price_provider: Arc<dyn PriceProvider>,
    pub price_failures: FailureCache,
    pub descriptors: Arc<DescriptorSet>,
}
