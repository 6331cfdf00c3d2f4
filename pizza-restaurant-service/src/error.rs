use axum::{http::StatusCode, response::IntoResponse, response::Json};

use crate::serializer::{ErrorResponse, ErrorsResponse};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Missing key: {0}")]
    MissingKey(&'static str),
    #[error("validation errors")]
    Validation,
    #[error("{0}")]
    MalformedBody(String),
    #[error("{0}")]
    Persistence(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Persistence(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        match &self {
            ApiError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message })).into_response()
            }
            ApiError::MissingKey(_)
            | ApiError::Validation
            | ApiError::MalformedBody(_)
            | ApiError::Persistence(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorsResponse {
                    errors: vec![message],
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(ApiError::NotFound("Restaurant")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Restaurant not found" }));
    }

    #[tokio::test]
    async fn test_missing_key_body() {
        let (status, body) = body_of(ApiError::MissingKey("price")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["Missing key: price"] }));
    }

    #[tokio::test]
    async fn test_validation_body() {
        let (status, body) = body_of(ApiError::Validation).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["validation errors"] }));
    }

    #[tokio::test]
    async fn test_persistence_body() {
        let (status, body) =
            body_of(ApiError::Persistence("FOREIGN KEY constraint failed".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["FOREIGN KEY constraint failed"] }));
    }
}
