use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Central error taxonomy for the BFF. Production responses scrub internal
/// detail; development responses carry it for debugging.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("unable to connect to API service: {source}")]
    Upstream {
        source: reqwest::Error,
        expose_details: bool,
    },

    #[error("request body exceeds {limit_mb} MB")]
    PayloadTooLarge { limit_mb: u64 },

    #[error("{message}")]
    Internal { message: String, expose_details: bool },
}

impl AppError {
    pub fn upstream(source: reqwest::Error, is_production: bool) -> Self {
        AppError::Upstream {
            source,
            expose_details: !is_production,
        }
    }

    pub fn internal(err: impl std::fmt::Display, is_production: bool) -> Self {
        AppError::Internal {
            message: err.to_string(),
            expose_details: !is_production,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Upstream {
                source,
                expose_details,
            } => {
                let mut body = json!({
                    "error": "Bad Gateway",
                    "message": "Unable to connect to API service",
                });
                if expose_details {
                    body["details"] = json!(source.to_string());
                }
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
            AppError::PayloadTooLarge { limit_mb } => {
                let body = json!({
                    "error": "Payload Too Large",
                    "message": format!("request body exceeds {limit_mb} MB"),
                });
                (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response()
            }
            AppError::Internal {
                message,
                expose_details,
            } => {
                let message = if expose_details {
                    message
                } else {
                    "An unexpected error occurred".to_string()
                };
                let body = json!({
                    "error": "Internal Server Error",
                    "message": message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
