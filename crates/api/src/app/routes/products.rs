use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use ivx_core::ProductId;

use crate::app::{dto, errors, AppState};

pub async fn list_products(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let items = filter.apply(state.catalog.products());
    (StatusCode::OK, Json(items)).into_response()
}

pub async fn get_product(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match ProductId::parse(&id) {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid product id"),
    };
    match state.catalog.get(&id) {
        Some(product) => (StatusCode::OK, Json(product.clone())).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "product not found"),
    }
}
