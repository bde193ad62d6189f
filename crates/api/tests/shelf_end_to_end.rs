use std::sync::Arc;
use std::time::Duration;

use ivx_api::app::{build_app, AppState};
use ivx_catalog::{Catalog, CatalogSource, SimulatedSource, SimulationConfig};
use ivx_core::ContentRef;
use ivx_shelf::{CacheConfig, FetchStatus, SelectOutcome, ShelfConfig, ShelfStore, ShelfClient};

/// Serve the real router with the given simulator settings on an ephemeral port.
async fn spawn_simulated(sim: SimulationConfig) -> (String, tokio::task::JoinHandle<()>) {
    let catalog = Catalog::builtin();
    let source = SimulatedSource::new(CatalogSource::new(catalog.clone()), sim)
        .expect("valid simulation config");
    let app = build_app(AppState::new(catalog, Arc::new(source)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base_url, handle)
}

fn store_for(base_url: &str) -> ShelfStore<ShelfClient> {
    ShelfConfig::new(base_url)
        .with_cache(CacheConfig {
            capacity: 8,
            ttl: None,
        })
        .build()
        .unwrap()
}

fn ids(outcome: &SelectOutcome) -> Vec<&str> {
    match outcome {
        SelectOutcome::Loaded(items) | SelectOutcome::Cached(items) => {
            items.iter().map(|p| p.id_typed().as_str()).collect()
        }
        other => panic!("expected items, got {other:?}"),
    }
}

#[tokio::test]
async fn store_loads_shelves_through_simulated_api() {
    let sim = SimulationConfig {
        min_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        failure_rate: 0.0,
        seed: Some(11),
    };
    let (base_url, handle) = spawn_simulated(sim).await;
    let store = store_for(&base_url);

    let v1 = ContentRef::video("v1").unwrap();
    let loaded = store.select(v1.clone()).await;
    assert!(matches!(loaded, SelectOutcome::Loaded(_)));
    assert_eq!(ids(&loaded), vec!["p1", "p2", "p3", "p15"]);

    let e2 = ContentRef::event("e2").unwrap();
    assert_eq!(ids(&store.select(e2).await), vec!["p10", "p11", "p12"]);

    // Back to v1: served from cache, items unchanged after the HTTP hop.
    let cached = store.select(v1.clone()).await;
    assert!(matches!(cached, SelectOutcome::Cached(_)));
    assert_eq!(ids(&cached), vec!["p1", "p2", "p3", "p15"]);

    let view = store.current().await.unwrap();
    assert_eq!(view.selection, v1);
    assert_eq!(view.entry.status, FetchStatus::Success);
    assert_eq!(view.entry.items[0].price().cents(), 2999);

    assert_eq!(
        store.select(ContentRef::video("v3").unwrap()).await,
        SelectOutcome::Loaded(Vec::new())
    );
    handle.abort();
}

#[tokio::test]
async fn injected_failure_reaches_store_as_network_error() {
    let sim = SimulationConfig {
        failure_rate: 1.0,
        ..SimulationConfig::disabled()
    };
    let (base_url, handle) = spawn_simulated(sim).await;
    let store = store_for(&base_url);

    let e1 = ContentRef::event("e1").unwrap();
    assert_eq!(
        store.select(e1.clone()).await,
        SelectOutcome::Failed("network error".to_string())
    );

    let entry = store.entry(&e1).await;
    assert_eq!(entry.status, FetchStatus::Error);
    assert!(entry.items.is_empty());
    assert_eq!(entry.error.as_deref(), Some("network error"));

    // Still failing upstream: retry goes over the wire again and fails the same way.
    assert_eq!(
        store.retry().await,
        Some(SelectOutcome::Failed("network error".to_string()))
    );
    handle.abort();
}
