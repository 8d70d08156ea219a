//! Workshop and registration models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use slipstone_core::{Email, RegistrationId, RegistrationPayment, UserId, WorkshopCategory, WorkshopId};

/// A schedulable studio event.
///
/// `seats` is the remaining capacity counter; it is decremented on
/// registration and restored on cancellation, and never goes negative.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Workshop {
    pub id: WorkshopId,
    pub title: String,
    pub description: String,
    pub category: WorkshopCategory,
    pub date: DateTime<Utc>,
    pub price: Decimal,
    pub seats: i32,
    pub created_at: DateTime<Utc>,
}

impl Workshop {
    /// Whether registering for this workshop requires a verified payment.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

/// A seat booking joining a user to a workshop.
///
/// Carries a denormalized snapshot of the workshop title and the user's
/// contact details so the booking record survives later edits to either
/// side. At most one registration exists per (user, workshop) pair.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Registration {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub workshop_id: WorkshopId,
    pub workshop_title: String,
    pub contact_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub seats: i32,
    pub payment: RegistrationPayment,
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}
