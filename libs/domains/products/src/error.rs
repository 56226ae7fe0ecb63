use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::InvalidBody(rejection) => AppError::JsonExtractorRejection(rejection),
            ProductError::Database(msg) => AppError::Database(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// A missing product is a bare 404 with no body; everything else uses the
/// shared JSON error envelope.
impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self {
            ProductError::NotFound(id) => {
                tracing::debug!(product_id = %id, "Product not found");
                StatusCode::NOT_FOUND.into_response()
            }
            other => AppError::from(other).into_response(),
        }
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for ProductError {
    fn from(err: serde_json::Error) -> Self {
        ProductError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = ProductError::NotFound("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_database_error_uses_error_envelope() {
        let response = ProductError::Database("socket closed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "DATABASE_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_app_error() {
        let app_error: AppError = ProductError::NotFound("abc".to_string()).into();
        assert!(matches!(app_error, AppError::NotFound(msg) if msg == "Product abc not found"));
    }
}
