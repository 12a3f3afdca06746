//! Router assembly

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// All API routes with permissive CORS, ready to serve
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-art", post(handlers::api::generate_art))
        .route(
            "/api/generate-collection",
            post(handlers::api::generate_collection),
        )
        .route("/api/load-user-data", post(handlers::api::load_user_data))
        .route("/api/upload-ipfs", post(handlers::api::upload_ipfs))
        .route("/api/debug", get(handlers::api::debug_config))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
