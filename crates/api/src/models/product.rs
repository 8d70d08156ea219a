//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use slipstone_core::ProductId;

/// A catalog product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
