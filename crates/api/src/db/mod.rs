//! Database operations for the `studio` `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `studio.users` - Accounts, credential hashes, and the single active
//!   one-time-code slot per user
//! - `studio.products` - Catalog
//! - `studio.orders` - Order lifecycle + tracking state (never deleted)
//! - `studio.workshops` / `studio.registrations` - Capacity-managed events
//! - `studio.news` / `studio.testimonials` / `studio.corporate_inquiries`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p slipstone-cli -- migrate
//! ```

pub mod content;
pub mod orders;
pub mod products;
pub mod users;
pub mod workshops;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use content::{InquiryRepository, NewsRepository, TestimonialRepository};
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;
pub use workshops::{RegisterOutcome, WorkshopRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
