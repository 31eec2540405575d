//! Error types for the server

use crate::error::StaywiseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Prediction unavailable: {0}")]
    Unavailable(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Prediction(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user
    pub fn message(&self) -> String {
        match self {
            ServerError::BadRequest(msg)
            | ServerError::NotFound(msg)
            | ServerError::Unavailable(msg)
            | ServerError::Prediction(msg) => msg.clone(),
            ServerError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl From<StaywiseError> for ServerError {
    fn from(err: StaywiseError) -> Self {
        match err {
            e if e.is_encoding() => ServerError::BadRequest(e.to_string()),
            e @ (StaywiseError::InvalidInput(_) | StaywiseError::ShapeError { .. }) => {
                ServerError::BadRequest(e.to_string())
            }
            e @ StaywiseError::PredictionDisabled(_) => ServerError::Unavailable(e.to_string()),
            e @ StaywiseError::PredictionError(_) => ServerError::Prediction(e.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::Internal(detail) => tracing::error!(detail = %detail, "Internal server error"),
            ServerError::Prediction(detail) => tracing::error!(detail = %detail, "Prediction error"),
            _ => {}
        }

        let body = Json(json!({
            "error": true,
            "message": self.message(),
        }));

        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
