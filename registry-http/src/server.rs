//! Router assembly and shared application state.

use axum::routing::get;
use axum::Router;
use registry_core::RegistryConfig;
use registry_observability::Counters;
use registry_store::Registry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub store: Arc<Registry>,
    pub counters: Arc<Counters>,
    pub config: Arc<RegistryConfig>,
}

pub type SharedState = Arc<AppState>;

pub fn build_router(state: SharedState) -> Router {
    tracing::debug!("assembling registry router: hello, access, delete, search, switch, metrics");
    Router::new()
        .route("/hello", get(crate::handlers::hello::handle))
        .route(
            "/access",
            get(crate::handlers::access::handle).post(crate::handlers::access::handle),
        )
        .route(
            "/delete",
            get(crate::handlers::delete::handle).post(crate::handlers::delete::handle),
        )
        .route(
            "/search",
            get(crate::handlers::search::handle).post(crate::handlers::search::handle),
        )
        .route(
            "/switch",
            get(crate::handlers::switch::handle).post(crate::handlers::switch::handle),
        )
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn metrics_handler(
    axum::extract::State(state): axum::extract::State<SharedState>,
) -> String {
    state.counters.refresh(&state.store);
    state.counters.gather_text()
}
