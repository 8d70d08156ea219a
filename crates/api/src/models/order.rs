//! Order model: the one aggregate with a real state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use slipstone_core::{Email, OrderId, OrderKind, OrderStatus, ProductId, TrackingStage, UserId};

/// Shipping destination captured at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// Bespoke-request payload carried only by custom orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDetails {
    pub description: String,
    pub material: Option<String>,
    /// URLs of customer-supplied reference images.
    pub reference_images: Vec<String>,
}

/// A placed order.
///
/// `status` is monotonic: once `Cancelled` no further mutation is permitted,
/// tracking advancement included. `tracking` moves strictly one stage forward
/// at a time. Orders are never physically deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    /// Catalog product behind a standard order, with a name snapshot taken
    /// at checkout so later catalog edits don't rewrite history.
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub customer_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub amount: Decimal,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub tracking: TrackingStage,
    /// Present only when a gateway transaction was verified at checkout.
    pub payment_ref: Option<String>,
    pub custom_description: Option<String>,
    pub custom_material: Option<String>,
    pub reference_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether the order has been cancelled (terminal).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}
