use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}
