// HTTP response mapping for vegetation errors
use crate::domain::error::VegetationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error body shape: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl VegetationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VegetationError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            VegetationError::NoData => StatusCode::NOT_FOUND,
            VegetationError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VegetationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::info!("Request rejected with {}: {}", status, self);
        }

        (status, Json(ErrorDetail { detail: self.to_string() })).into_response()
    }
}
