use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::warn;

use crate::models::{AppState, TopAnswerResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/questions/{id}/top-answer", get(top_answer))
        .with_state(state)
}

/// GET /questions/{id}/top-answer
///
/// Lookup failures come back as `body: null`; the page treats that the same
/// as a question without answers.
async fn top_answer(
    State(state): State<AppState>,
    Path(question_id): Path<u64>,
) -> Json<TopAnswerResponse> {
    let body = match state.stack_exchange.top_answer(question_id).await {
        Ok(body) => body,
        Err(e) => {
            warn!(question_id, error = %e, "Top answer lookup failed");
            None
        }
    };

    Json(TopAnswerResponse { question_id, body })
}
