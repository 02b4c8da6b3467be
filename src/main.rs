use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use sp500_dashboard_backend::app;
use sp500_dashboard_backend::config::AppConfig;
use sp500_dashboard_backend::external::wikipedia::WikipediaProvider;
use sp500_dashboard_backend::external::yahoo::YahooFinanceProvider;
use sp500_dashboard_backend::logging::{init_logging, LoggingConfig};
use sp500_dashboard_backend::models::DescriptorSet;
use sp500_dashboard_backend::services::failure_cache::FailureCache;
use sp500_dashboard_backend::services::reference::ReferenceCache;
use sp500_dashboard_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(LoggingConfig::from_env())?;

    let descriptors = DescriptorSet::load(Path::new(&config.descriptors_path))?;
    tracing::info!(
        "tracking {} symbols from {}",
        descriptors.entries().len(),
        config.descriptors_path
    );

    let state = AppState {
        reference: ReferenceCache::new(Arc::new(WikipediaProvider::new(
            config.constituents_url.clone(),
        ))),
        price_provider: Arc::new(YahooFinanceProvider::new()),
        price_failures: FailureCache::new(),
        descriptors: Arc::new(descriptors),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 dashboard backend listening on http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
