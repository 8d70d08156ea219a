//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use slipstone_core::ProductId;

use crate::db::ProductRepository;
use crate::db::products::ProductInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Product create/update body.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Public catalog listing.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(json!({ "products": products })))
}

/// Product detail.
pub async fn get_one(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(json!({ "product": product })))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ProductRequest>,
) -> Result<Json<Value>> {
    validate(&body)?;

    let product = ProductRepository::new(state.pool())
        .create(ProductInput {
            name: &body.name,
            description: &body.description,
            price: body.price,
            image_url: body.image_url.as_deref(),
        })
        .await?;

    Ok(Json(json!({ "product": product })))
}

/// Update a product.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<Value>> {
    validate(&body)?;

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            ProductInput {
                name: &body.name,
                description: &body.description,
                price: body.price,
                image_url: body.image_url.as_deref(),
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("product not found".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "product": product })))
}

/// Delete a product.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("product not found".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true })))
}

fn validate(body: &ProductRequest) -> Result<()> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("product name is required".to_owned()));
    }
    if body.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price cannot be negative".to_owned()));
    }
    Ok(())
}
