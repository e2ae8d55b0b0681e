// Shared error taxonomy for the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::notify::DispatchError;
use crate::search::SearchError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] SearchError),

    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Busy(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) | AppError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Upstream and transport details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Busy(msg) => msg.clone(),
            AppError::Upstream(_) => "Error fetching from APIs".to_string(),
            AppError::Dispatch(_) => "Failed to send email".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (
            status,
            Json(serde_json::json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("Search query is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Busy("later".into()).status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::Upstream(SearchError::Status { provider: "reddit", status: 503 }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Dispatch(DispatchError::Transport("rejected".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_hides_provider() {
        let err = AppError::Upstream(SearchError::Status { provider: "stackexchange", status: 502 });
        assert_eq!(err.public_message(), "Error fetching from APIs");
        assert!(!err.public_message().contains("stackexchange"));
    }
}
