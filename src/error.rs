use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("Invalid row index")]
    InvalidRowIndex { row_index: i64, last_row: usize },

    #[error("Invalid action")]
    InvalidAction { action: String },

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Not found: {path}")]
    RouteNotFound { path: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::SheetNotFound { .. } | GatewayError::RouteNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            GatewayError::InvalidRowIndex { .. }
            | GatewayError::InvalidAction { .. }
            | GatewayError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope shared by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            GatewayError::InvalidRowIndex { row_index, last_row } => {
                warn!("Rejected row index {} (last row {})", row_index, last_row);
            }
            GatewayError::InvalidAction { action } => {
                warn!("Rejected unknown action: {:?}", action);
            }
            GatewayError::Internal(msg) => {
                error!("Request failed: {}", msg);
            }
            other => {
                warn!("Request failed: {}", other);
            }
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Internal(format!("IO error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
