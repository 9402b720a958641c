//! Error responses.
//!
//! # Responsibilities
//! - Map product errors to HTTP status codes (400, 404, 500)
//! - Render every failure as a JSON `{ "message": ... }` body
//! - Log failures at a level matching their class
//!
//! # Design Decisions
//! - Store messages are returned verbatim unless `expose_internal_errors` is off
//! - Body extraction failures are client errors (400)
//! - Path extraction failures are 404, like any id that matches nothing

use axum::{
    extract::rejection::{BytesRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::products::ProductError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

/// An error ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    /// Convert a product error, redacting store details unless `expose_internal` is set.
    pub fn from_product(err: ProductError, expose_internal: bool) -> Self {
        match err {
            ProductError::Validation(e) => {
                tracing::warn!(error = %e, "Validation failed");
                ApiError::BadRequest(e.to_string())
            }
            ProductError::NotFound(id) => {
                tracing::warn!(id = %id, "Product not found");
                ApiError::NotFound("Product not found".to_string())
            }
            ProductError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                if expose_internal {
                    ApiError::Internal(e.to_string())
                } else {
                    ApiError::Internal(GENERIC_INTERNAL_MESSAGE.to_string())
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) | ApiError::Internal(m) => m,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection, "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!(error = %rejection, "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

/// An id that cannot be decoded from the path matches no product.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!(error = %rejection, "Undecodable product id");
        ApiError::NotFound("Product not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            message: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::schema::validate_new;
    use crate::store::StoreError;

    fn store_error() -> ProductError {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = mongodb::error::Error::from(io);
        ProductError::Store(StoreError::Mongo(err))
    }

    #[test]
    fn test_status_mapping() {
        let rejected = validate_new(&serde_json::json!({})).unwrap_err();
        let validation = ProductError::Validation(rejected);
        assert_eq!(ApiError::from_product(validation, true).status(), StatusCode::BAD_REQUEST);

        let missing = ProductError::NotFound("abc".into());
        let api = ApiError::from_product(missing, true);
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.message(), "Product not found");

        assert_eq!(
            ApiError::from_product(store_error(), true).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_messages_can_be_redacted() {
        assert_eq!(
            ApiError::from_product(store_error(), false).message(),
            GENERIC_INTERNAL_MESSAGE
        );
        assert_ne!(
            ApiError::from_product(store_error(), true).message(),
            GENERIC_INTERNAL_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::NotFound("Product not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Product not found");
    }
}
