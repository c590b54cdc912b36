use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::api::payload::PayloadError;

pub type Result<T> = core::result::Result<T, ApiError>;

/// Errors surfaced to HTTP clients as `{"error": "<message>"}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Member with the same ID already exists")]
    DuplicateId,

    #[error("Member not found")]
    MemberNotFound,

    #[error("Not Found")]
    RouteNotFound,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::Payload(_) | ApiError::DuplicateId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MemberNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        } else {
            warn!("Rejected request with {}: {:?}", status, self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
