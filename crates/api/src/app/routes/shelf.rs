use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use ivx_catalog::ProductSource;

use crate::app::{dto, errors, AppState};

/// Products associated with one video or event.
pub async fn ivx_products(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<dto::ShelfQuery>,
) -> axum::response::Response {
    let target = match query.target() {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    match state.shelf_source.fetch(&target).await {
        Ok(items) => {
            tracing::debug!(content = %target, items = items.len(), "shelf served");
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            tracing::warn!(content = %target, error = %e, "shelf fetch failed");
            errors::fetch_error_to_response(e)
        }
    }
}
