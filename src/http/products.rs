use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::products::{Product, ProductError};

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub product: Product,
}

impl AppState {
    fn reject(&self, err: ProductError) -> ApiError {
        ApiError::from_product(err, self.config.security.expose_internal_errors)
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let product = state.products.create(&body).await.map_err(|e| state.reject(e))?;

    tracing::info!(id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.find_all().await.map_err(|e| state.reject(e))?;
    Ok(Json(products))
}

/// True for `application/json` and `+json` media types.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Decode an update body. An absent body, or one that is not declared as JSON, is an
/// empty patch; a declared JSON body must parse.
fn patch_body(headers: &HeaderMap, body: Bytes) -> Result<Value, ApiError> {
    if body.is_empty() || !is_json_content_type(headers) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request body");
        ApiError::BadRequest(format!("Failed to parse the request body as JSON: {e}"))
    })
}

pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = path?;
    let body = patch_body(&headers, payload?)?;
    let product = state
        .products
        .find_by_id_and_update(&id, &body)
        .await
        .map_err(|e| state.reject(e))?;

    tracing::info!(id = %product.id, "Product updated");
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = path?;
    let product = state
        .products
        .find_by_id_and_delete(&id)
        .await
        .map_err(|e| state.reject(e))?;

    tracing::info!(id = %product.id, "Product deleted");
    Ok(Json(DeleteResponse {
        message: "Product deleted".to_string(),
        product,
    }))
}

/// Fallback for unknown paths and unsupported methods.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
