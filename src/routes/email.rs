use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::models::{AppState, MessageResponse, SendEmailRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send-email", post(send_email))
        .with_state(state)
}

/// POST /send-email with `{ email, results }`
async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected send-email body");
        AppError::Validation("Email and results are required".to_string())
    })?;

    let request = request.into_email_request()?;
    let recipient = request.recipient_address.clone();

    state.dispatcher.dispatch(request).await?;
    info!(recipient = %recipient, "Results email sent");

    Ok(Json(MessageResponse {
        message: "Email sent successfully!".to_string(),
    }))
}
