use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{companies, dashboard, health, prices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/api/health", health::router())
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/companies", companies::router())
        .nest("/api/prices", prices::router())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}
