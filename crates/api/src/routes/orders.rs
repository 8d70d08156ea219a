//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use slipstone_core::{Email, OrderId, OrderKind, ProductId, TrackingStage, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireAdmin, RequireUser};
use crate::models::{CurrentUser, CustomDetails, ShippingAddress};
use crate::services::orders::{CancelActor, PlaceOrder};
use crate::services::{OrderService, PaymentProof};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub email: String,
    pub otp: String,
    #[serde(default)]
    pub order_type: OrderKind,
    pub product_id: Option<i32>,
    #[serde(default)]
    pub amount: Decimal,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    // Gateway callback fields, present for paid standard checkouts
    pub payment_order_ref: Option<String>,
    pub payment_ref: Option<String>,
    pub payment_signature: Option<String>,
    // Bespoke-request fields, present for custom orders
    pub custom_description: Option<String>,
    pub custom_material: Option<String>,
    #[serde(default)]
    pub reference_images: Vec<String>,
}

impl BuyRequest {
    /// Assemble the gateway proof if the client sent all three fields.
    fn payment_proof(&self) -> Option<PaymentProof> {
        match (&self.payment_order_ref, &self.payment_ref, &self.payment_signature) {
            (Some(order_ref), Some(payment_ref), Some(signature)) => Some(PaymentProof {
                order_ref: order_ref.clone(),
                payment_ref: payment_ref.clone(),
                signature: signature.clone(),
            }),
            _ => None,
        }
    }

    /// Assemble the bespoke-request payload for custom orders.
    fn custom_details(&self) -> Option<CustomDetails> {
        self.custom_description
            .as_ref()
            .map(|description| CustomDetails {
                description: description.clone(),
                material: self.custom_material.clone(),
                reference_images: self.reference_images.clone(),
            })
    }
}

/// Cancellation request body. Customers supply both fields; an admin
/// session needs neither.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

/// Tracking advancement request body.
#[derive(Debug, Deserialize)]
pub struct TrackingUpdateRequest {
    pub tracking_status: TrackingStage,
}

// =============================================================================
// Handlers
// =============================================================================

/// Public checkout-widget configuration: the gateway key id. The key
/// secret never leaves the server.
pub async fn payment_config(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "key_id": state.config().payment.key_id }))
}

/// OTP-gated checkout for standard and custom orders.
pub async fn buy(State(state): State<AppState>, Json(body): Json<BuyRequest>) -> Result<Json<Value>> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let payment = body.payment_proof();
    let custom = body.custom_details();

    let service = OrderService::new(state.pool(), state.payments(), state.email());
    let order = service
        .place_order(PlaceOrder {
            email,
            otp: body.otp,
            kind: body.order_type,
            product_id: body.product_id.map(ProductId::new),
            amount: body.amount,
            customer_name: body.name,
            phone: body.phone,
            shipping: ShippingAddress {
                address: body.address,
                city: body.city,
                zip: body.zip,
            },
            payment,
            custom,
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "order placed",
        "order_id": order.id,
    })))
}

/// All orders, for the operations console.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let service = OrderService::new(state.pool(), state.payments(), state.email());
    let orders = service.list().await?;
    Ok(Json(json!({ "orders": orders })))
}

/// Order detail, for the operations console.
pub async fn get_one(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let service = OrderService::new(state.pool(), state.payments(), state.email());
    let order = service.get(OrderId::new(id)).await?;
    Ok(Json(json!({ "order": order })))
}

/// A user's order history. Visible to the owner and to admins only.
pub async fn list_for_user(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(user_id): Path<i32>,
) -> Result<Json<Value>> {
    let user_id = UserId::new(user_id);
    if current.id != user_id && !current.is_admin() {
        return Err(AppError::Forbidden(
            "cannot view another customer's orders".to_owned(),
        ));
    }

    let service = OrderService::new(state.pool(), state.payments(), state.email());
    let orders = service.list_for_user(user_id).await?;
    Ok(Json(json!({ "orders": orders })))
}

/// Cancel an order. Customers pass the OTP gate; an admin session (and
/// only the session - never a body flag) bypasses it.
pub async fn cancel(
    State(state): State<AppState>,
    OptionalUser(current): OptionalUser,
    Path(id): Path<i32>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<Value>> {
    let actor = if current.as_ref().is_some_and(CurrentUser::is_admin) {
        CancelActor::Admin
    } else {
        let (Some(email), Some(otp)) = (body.email, body.otp) else {
            return Err(AppError::BadRequest(
                "email and otp are required to cancel an order".to_owned(),
            ));
        };
        let email = Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        CancelActor::Customer { email, otp }
    };

    let service = OrderService::new(state.pool(), state.payments(), state.email());
    service.cancel_order(OrderId::new(id), actor).await?;

    Ok(Json(json!({ "success": true })))
}

/// Advance an order's tracking one stage.
pub async fn update_tracking(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<TrackingUpdateRequest>,
) -> Result<Json<Value>> {
    let service = OrderService::new(state.pool(), state.payments(), state.email());
    service
        .advance_tracking(OrderId::new(id), body.tracking_status)
        .await?;

    Ok(Json(json!({ "success": true, "tracking_status": body.tracking_status })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_request_minimal_custom() {
        let body: BuyRequest = serde_json::from_str(
            r#"{
                "email": "alice@example.com",
                "otp": "482913",
                "order_type": "CUSTOM",
                "name": "Alice",
                "phone": "555-0100",
                "address": "12 Glaze Row",
                "city": "Portland",
                "zip": "97201",
                "custom_description": "A speckled dinner set for six"
            }"#,
        )
        .unwrap();

        assert_eq!(body.order_type, OrderKind::Custom);
        assert_eq!(body.amount, Decimal::ZERO);
        assert!(body.payment_proof().is_none());
        assert!(body.reference_images.is_empty());

        let custom = body.custom_details().unwrap();
        assert_eq!(custom.description, "A speckled dinner set for six");
        assert!(custom.material.is_none());
    }

    #[test]
    fn test_buy_request_paid_standard() {
        let body: BuyRequest = serde_json::from_str(
            r#"{
                "email": "alice@example.com",
                "otp": "482913",
                "order_type": "STANDARD",
                "amount": "500",
                "name": "Alice",
                "phone": "555-0100",
                "address": "12 Glaze Row",
                "city": "Portland",
                "zip": "97201",
                "payment_order_ref": "order_abc",
                "payment_ref": "pay_def",
                "payment_signature": "deadbeef"
            }"#,
        )
        .unwrap();

        assert_eq!(body.amount, Decimal::from(500));
        let proof = body.payment_proof().unwrap();
        assert_eq!(proof.order_ref, "order_abc");
        assert_eq!(proof.payment_ref, "pay_def");
    }

    #[test]
    fn test_partial_payment_fields_yield_no_proof() {
        let body: BuyRequest = serde_json::from_str(
            r#"{
                "email": "alice@example.com",
                "otp": "482913",
                "name": "Alice",
                "phone": "555-0100",
                "address": "12 Glaze Row",
                "city": "Portland",
                "zip": "97201",
                "payment_ref": "pay_def"
            }"#,
        )
        .unwrap();

        assert!(body.payment_proof().is_none());
    }

    #[test]
    fn test_tracking_update_accepts_wire_labels() {
        let body: TrackingUpdateRequest =
            serde_json::from_str(r#"{"tracking_status": "Reached at final station"}"#).unwrap();
        assert_eq!(body.tracking_status, TrackingStage::ReachedFinalStation);
    }
}
