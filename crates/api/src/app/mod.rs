//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: query DTOs and their validation
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use ivx_catalog::{Catalog, CatalogSource, ProductSource, SimulatedSource};

use crate::config::ServerConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Full catalog (listing and lookup by id).
    pub catalog: Arc<Catalog>,
    /// Answers shelf queries; simulated or direct depending on configuration.
    pub shelf_source: Arc<dyn ProductSource>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, shelf_source: Arc<dyn ProductSource>) -> Self {
        Self {
            catalog,
            shelf_source,
        }
    }

    /// Shelves served straight from `catalog`, with no simulation.
    pub fn direct(catalog: Arc<Catalog>) -> Self {
        let source = Arc::new(CatalogSource::new(catalog.clone()));
        Self::new(catalog, source)
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let catalog = config.load_catalog().context("failed to load catalog")?;

        let state = match config.simulation() {
            Some(sim) => {
                tracing::info!(
                    failure_rate = sim.failure_rate,
                    min_delay_ms = sim.min_delay.as_millis() as u64,
                    max_delay_ms = sim.max_delay.as_millis() as u64,
                    "shelf fetch simulation enabled"
                );
                let source = SimulatedSource::new(CatalogSource::new(catalog.clone()), sim)
                    .context("invalid simulation settings")?;
                Self::new(catalog, Arc::new(source))
            }
            None => Self::direct(catalog),
        };

        tracing::info!(products = state.catalog.len(), "catalog ready");
        Ok(state)
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .layer(Extension(Arc::new(state))),
        )
}
