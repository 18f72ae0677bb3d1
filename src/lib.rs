//! Package costing service for a Hajj/Umrah travel agency back office.
//!
//! The [`pricing`] module holds the costing engine; the rest of the crate
//! hosts it over HTTP for the package creation and edit screens.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::DraftCache;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cache: DraftCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            cache: DraftCache::new(&config),
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api/costing", pricing::router())
        .fallback(routes::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    if state.config.cors_allow_any {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
