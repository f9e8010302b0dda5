use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::AnalyticsError;
use crate::models::ErrorResponse;
use crate::services::StoreError;

/// Error returned by HTTP handlers, rendered as an [`ErrorResponse`]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    BadRequest { error: &'static str, message: String },
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Analytics(AnalyticsError::InsufficientData { .. }) => "insufficient_data",
            ApiError::Analytics(AnalyticsError::Unavailable { .. }) => "unavailable",
            ApiError::Analytics(AnalyticsError::InvalidInput(_)) => "invalid_input",
            ApiError::Store(StoreError::NotFound(_)) | ApiError::NotFound(_) => "not_found",
            ApiError::Store(_) => "store_error",
            ApiError::Validation(_) => "validation_failed",
            ApiError::BadRequest { error, .. } => *error,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Analytics(e) if e.is_recoverable() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Analytics(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest {
        error: "invalid_json",
        message: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ApiError::BadRequest {
        error: "invalid_query",
        message: format!("Invalid query: {}", err),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let insufficient = ApiError::from(AnalyticsError::InsufficientData { available: 2, required: 5 });
        assert_eq!(insufficient.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let unavailable = ApiError::from(AnalyticsError::Unavailable { available: 1 });
        assert_eq!(unavailable.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid = ApiError::from(AnalyticsError::InvalidInput("slope".to_string()));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(StoreError::NotFound("profile".to_string()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.kind(), "not_found");
    }
}
