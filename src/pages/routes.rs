use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::metrics::Metrics;

use super::handlers;
use super::renderer::PageRenderer;

#[derive(Clone)]
pub struct PagesState {
    pub renderer: Arc<PageRenderer>,
    pub metrics: Metrics,
}

pub fn create_router(renderer: Arc<PageRenderer>, metrics: Metrics) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        .route("/style.css", get(handlers::stylesheet))
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "message": "AppleBite site is running"
                }))
            }),
        )
        .fallback(handlers::not_found)
        .with_state(PagesState { renderer, metrics })
}
