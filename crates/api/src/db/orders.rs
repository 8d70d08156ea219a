//! Order repository.
//!
//! Orders are append-and-mutate only: rows are never deleted, cancellation
//! and tracking advancement are conditional updates so concurrent writers
//! cannot skip a stage or cancel twice.

use sqlx::PgPool;

use slipstone_core::{Email, OrderId, OrderKind, ProductId, TrackingStage, UserId};

use super::RepositoryError;
use crate::models::Order;
use rust_decimal::Decimal;

const ORDER_COLUMNS: &str = "id, user_id, product_id, product_name, customer_name, email, \
     phone, address, city, zip, amount, kind, status, tracking, payment_ref, \
     custom_description, custom_material, reference_images, created_at, updated_at";

/// A new order to be inserted.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub user_id: Option<UserId>,
    pub product_id: Option<ProductId>,
    pub product_name: Option<&'a str>,
    pub customer_name: &'a str,
    pub email: &'a Email,
    pub phone: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub zip: &'a str,
    pub amount: Decimal,
    pub kind: OrderKind,
    pub payment_ref: Option<&'a str>,
    pub custom_description: Option<&'a str>,
    pub custom_material: Option<&'a str>,
    pub reference_images: &'a [String],
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order with tracking stage `Processing` and an active
    /// lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewOrder<'_>) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO studio.orders
                (user_id, product_id, product_name, customer_name, email, phone, address,
                 city, zip, amount, kind, payment_ref, custom_description, custom_material,
                 reference_images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new.user_id)
        .bind(new.product_id)
        .bind(new.product_name)
        .bind(new.customer_name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.address)
        .bind(new.city)
        .bind(new.zip)
        .bind(new.amount)
        .bind(new.kind)
        .bind(new.payment_ref)
        .bind(new.custom_description)
        .bind(new.custom_material)
        .bind(new.reference_images)
        .fetch_one(self.pool)
        .await?;

        Ok(order)
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM studio.orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM studio.orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// List the orders belonging to a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM studio.orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Advance tracking from `from` to `to`, guarded against concurrent
    /// mutation and against cancelled orders.
    ///
    /// Returns `true` if the row was updated; `false` means the order's
    /// tracking stage or lifecycle status changed underneath the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn advance_tracking(
        &self,
        id: OrderId,
        from: TrackingStage,
        to: TrackingStage,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE studio.orders
            SET tracking = $3, updated_at = now()
            WHERE id = $1 AND tracking = $2 AND status <> 'cancelled'
            ",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Cancel an order. One-way: the update only applies while the order
    /// is not already cancelled.
    ///
    /// Returns `true` if this call performed the cancellation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cancel(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE studio.orders
            SET status = 'cancelled', updated_at = now()
            WHERE id = $1 AND status <> 'cancelled'
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
