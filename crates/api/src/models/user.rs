//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use slipstone_core::{Email, UserId, UserRole};

/// A storefront account.
///
/// The credential hash and any outstanding one-time code live only in the
/// database layer; they are never carried on this model or serialized out.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub is_verified: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
