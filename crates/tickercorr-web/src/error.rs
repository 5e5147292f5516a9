use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tickercorr_core::ServiceError;
use tracing::{error, warn};

/// Failures starting or running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid port '{value}'")]
    InvalidPort { value: String },
    #[error("invalid bind address '{value}'")]
    InvalidAddress { value: String },
    #[error("invalid CORS origin '{value}'")]
    InvalidOrigin { value: String },
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Query failure rendered as `{ "error": ... }` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            // Unpairable series come from the provider, not the caller.
            ServiceError::Upstream(_) | ServiceError::Aggregation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            ServiceError::NotFound(fetch) | ServiceError::Upstream(fetch) => {
                fetch.message().to_owned()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.0.code(), error = %self.0, "query failed");
        } else {
            warn!(code = self.0.code(), error = %self.0, "query rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
