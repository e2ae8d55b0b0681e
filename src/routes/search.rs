use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, warn};

use crate::models::{AppState, SearchParams};
use crate::search::{AggregatedResults, SortOrder};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(state)
}

/// GET /search?q=<query>&sort=<sort>
async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<AggregatedResults>> {
    let Query(params) = params.map_err(|e| {
        warn!(error = %e, "Rejected search query string");
        AppError::Validation("Search query is required".to_string())
    })?;

    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

    let sort: SortOrder = params
        .sort
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: crate::search::UnknownSort| AppError::Validation(e.to_string()))?;

    let _guard = state
        .searches
        .try_acquire(format!("{}|{}", query.to_lowercase(), sort))
        .ok_or_else(|| AppError::Busy("A search for this query is already in progress".to_string()))?;

    info!(query = %query, sort = %sort, "Received search request");

    let results = state.aggregator.search(query, sort).await?;
    Ok(Json(results))
}
