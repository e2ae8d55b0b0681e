// QA Digest - search StackOverflow and Reddit side by side, email the results

pub mod config;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod render;
pub mod routes;
pub mod search;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
