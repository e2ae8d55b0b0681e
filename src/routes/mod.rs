//! API Routes
//!
//! - `GET /search` - Query both providers
//! - `POST /send-email` - Email a result list
//! - `GET /questions/{id}/top-answer` - Lazy top answer lookup
//! - `GET /api/health` - Health check
//! - `/` - Search page

pub mod email;
pub mod health;
pub mod questions;
pub mod search;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(search::router(state.clone()))
        .merge(email::router(state.clone()))
        .merge(questions::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router())
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}
