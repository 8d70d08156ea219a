//! Workshop route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use slipstone_core::{WorkshopCategory, WorkshopId};

use crate::db::workshops::WorkshopInput;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::services::{PaymentProof, WorkshopService};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Workshop create/update body.
#[derive(Debug, Deserialize)]
pub struct WorkshopRequest {
    pub title: String,
    pub description: String,
    pub category: WorkshopCategory,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub price: Decimal,
    pub seats: i32,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub workshop_id: i32,
    #[serde(default = "default_seats")]
    pub seats: i32,
    // Gateway callback fields, present for paid workshops
    pub payment_order_ref: Option<String>,
    pub payment_ref: Option<String>,
    pub payment_signature: Option<String>,
}

const fn default_seats() -> i32 {
    1
}

impl RegisterRequest {
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
}

/// Booking cancellation body.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub workshop_id: i32,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all workshops.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let workshops = service.list().await?;
    Ok(Json(json!({ "workshops": workshops })))
}

/// Workshop detail.
pub async fn get_one(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let workshop = service.get(WorkshopId::new(id)).await?;
    Ok(Json(json!({ "workshop": workshop })))
}

/// Create a workshop.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<WorkshopRequest>,
) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let workshop = service
        .create(WorkshopInput {
            title: &body.title,
            description: &body.description,
            category: body.category,
            date: body.date,
            price: body.price,
            seats: body.seats,
        })
        .await?;

    Ok(Json(json!({ "workshop": workshop })))
}

/// Update a workshop. Rejected once any registration exists.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<WorkshopRequest>,
) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let workshop = service
        .update(
            WorkshopId::new(id),
            WorkshopInput {
                title: &body.title,
                description: &body.description,
                category: body.category,
                date: body.date,
                price: body.price,
                seats: body.seats,
            },
        )
        .await?;

    Ok(Json(json!({ "workshop": workshop })))
}

/// Delete a workshop. Rejected once any registration exists.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    service.delete(WorkshopId::new(id)).await?;
    Ok(Json(json!({ "success": true })))
}

/// Book seats on a workshop for the session user.
pub async fn register(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>> {
    let proof = body.payment_proof();

    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let registration = service
        .register(
            &user,
            WorkshopId::new(body.workshop_id),
            body.seats,
            proof.as_ref(),
        )
        .await?;

    Ok(Json(json!({ "success": true, "registration": registration })))
}

/// Release the session user's booking.
pub async fn cancel(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CancelRequest>,
) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    service.cancel(&user, WorkshopId::new(body.workshop_id)).await?;
    Ok(Json(json!({ "success": true })))
}

/// The session user's bookings.
pub async fn my_registrations(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let registrations = service.my_registrations(&user).await?;
    Ok(Json(json!({ "registrations": registrations })))
}

/// All bookings, for the operations console.
pub async fn all_registrations(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let service = WorkshopService::new(state.pool(), state.payments(), state.email());
    let registrations = service.all_registrations().await?;
    Ok(Json(json!({ "registrations": registrations })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_defaults_to_one_seat() {
        let body: RegisterRequest = serde_json::from_str(r#"{"workshop_id": 3}"#).unwrap();
        assert_eq!(body.seats, 1);
        assert!(body.payment_proof().is_none());
    }

    #[test]
    fn test_workshop_request_categories() {
        let body: WorkshopRequest = serde_json::from_str(
            r#"{
                "title": "Hand-throwing Basics",
                "description": "An introduction to the wheel",
                "category": "ONE_ON_ONE",
                "date": "2026-09-12T10:00:00Z",
                "price": "40",
                "seats": 1
            }"#,
        )
        .unwrap();
        assert_eq!(body.category, WorkshopCategory::OneOnOne);
        assert_eq!(body.seats, 1);
    }
}
