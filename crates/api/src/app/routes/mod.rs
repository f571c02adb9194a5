use axum::{Router, routing::post};

pub mod export;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/presets/export",
            post(export::export_presets).get(export::export_presets_query),
        )
        .route(
            "/presets/export/raw",
            post(export::export_raw).get(export::export_raw_query),
        )
}
