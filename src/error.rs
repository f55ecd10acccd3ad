use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::models::{ErrorBody, FieldError};
use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    Validation(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Validation(details) => {
                (StatusCode::BAD_REQUEST, "validation failed".into(), details)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::Internal(msg) => {
                error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, Vec::new())
            }
        };
        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => ApiError::NotFound(value.to_string()),
            StoreError::Conflict => ApiError::Conflict(value.to_string()),
            StoreError::InvalidDateRange => ApiError::BadRequest(value.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        debug!("rejected request body: {value}");
        ApiError::BadRequest("invalid JSON payload".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_plain_error_body() {
        let response = ApiError::NotFound("course not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"error": "course not found"}));
    }

    #[tokio::test]
    async fn test_validation_body_carries_details() {
        let response =
            ApiError::Validation(vec![FieldError::new("slug", "slug is required")]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["details"][0]["field"], "slug");
        assert_eq!(body["details"][0]["message"], "slug is required");
    }

    #[test]
    fn test_store_errors_map_to_status() {
        assert!(matches!(
            ApiError::from(StoreError::Conflict),
            ApiError::Conflict(msg) if msg == "course with this slug already exists"
        ));
        assert!(matches!(
            ApiError::from(StoreError::InvalidDateRange),
            ApiError::BadRequest(msg) if msg == "endDate must be after startDate"
        ));
    }
}
