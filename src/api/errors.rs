use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Purchase not found: [{order_id}]")]
    NotFound { order_id: String },
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Export failed: {0}")]
    Export(#[from] csv::Error)
}

impl ApiError {
    pub fn not_found(order_id: &str) -> Self {
        ApiError::NotFound { order_id: order_id.to_string() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed: {self}");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
