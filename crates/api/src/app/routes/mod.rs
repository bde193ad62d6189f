use axum::{routing::get, Router};

pub mod products;
pub mod shelf;
pub mod system;

/// Router for all catalog and shelf endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/ivx-products", get(shelf::ivx_products))
        .route("/api/products", get(products::list_products))
        .route("/api/products/:id", get(products::get_product))
}
