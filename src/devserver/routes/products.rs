//! Product Routes
//!
//! - GET /api/products - List the catalogue
//! - POST /api/products - Create a product (admin)
//! - PUT /api/products/:id - Replace a product's fields (admin)
//! - DELETE /api/products/:id - Delete a product (admin)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::require_admin;
use crate::client::{Product, ProductInput};
use crate::devserver::error::{DevApiError, DevApiResult};
use crate::devserver::state::DevState;

/// GET /api/products
pub async fn list_products(State(state): State<Arc<DevState>>) -> Json<Vec<Product>> {
    Json(state.products().await)
}

/// POST /api/products
pub async fn create_product(
    State(state): State<Arc<DevState>>,
    headers: HeaderMap,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> DevApiResult<(StatusCode, Json<Product>)> {
    require_admin(&state, &headers).await?;
    let Json(input) = body?;
    let input = validate_product(input)?;

    let product = state.create_product(input).await;
    tracing::info!(product_id = %product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> DevApiResult<Json<Product>> {
    require_admin(&state, &headers).await?;
    let Json(input) = body?;
    let input = validate_product(input)?;

    let product = state.update_product(&id, input).await?;
    tracing::info!(product_id = %id, "Updated product");

    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> DevApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    state.delete_product(&id).await?;
    tracing::info!(product_id = %id, "Deleted product");

    Ok(Json(json!({ "message": "Product removed" })))
}

/// Trim text fields and reject empty or negative values
fn validate_product(mut input: ProductInput) -> DevApiResult<ProductInput> {
    input.name = input.name.trim().to_string();
    input.category = input.category.trim().to_string();
    input.image = input.image.trim().to_string();

    if input.name.is_empty() {
        return Err(DevApiError::Validation("Product name is required".to_string()));
    }
    if input.category.is_empty() {
        return Err(DevApiError::Validation("Category is required".to_string()));
    }
    if !input.price.is_finite() || input.price < 0.0 {
        return Err(DevApiError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(input)
}
