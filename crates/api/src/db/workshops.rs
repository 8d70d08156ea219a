//! Workshop and registration repository.
//!
//! Registration and the seat decrement happen inside one transaction with a
//! conditional `seats >= n` update, so two concurrent registrations can
//! never over-book and a crash mid-operation leaves nothing half-applied.

use sqlx::PgPool;

use slipstone_core::{Email, RegistrationPayment, UserId, WorkshopCategory, WorkshopId};

use super::RepositoryError;
use crate::models::{Registration, Workshop};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

const WORKSHOP_COLUMNS: &str = "id, title, description, category, date, price, seats, created_at";
const REGISTRATION_COLUMNS: &str = "id, user_id, workshop_id, workshop_title, contact_name, \
     email, phone, seats, payment, payment_ref, created_at";

/// Workshop fields supplied by the operations console.
#[derive(Debug)]
pub struct WorkshopInput<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: WorkshopCategory,
    pub date: DateTime<Utc>,
    pub price: Decimal,
    pub seats: i32,
}

/// A new registration to be inserted.
#[derive(Debug)]
pub struct NewRegistration<'a> {
    pub user_id: UserId,
    pub workshop_id: WorkshopId,
    pub workshop_title: &'a str,
    pub contact_name: &'a str,
    pub email: &'a Email,
    pub phone: Option<&'a str>,
    pub seats: i32,
    pub payment: RegistrationPayment,
    pub payment_ref: Option<&'a str>,
}

/// Result of an attempted registration.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The registration was created and the seats were decremented.
    Registered(Registration),
    /// The workshop had fewer seats left than requested; nothing changed.
    InsufficientSeats,
}

/// Repository for workshop and registration database operations.
pub struct WorkshopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkshopRepository<'a> {
    /// Create a new workshop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a workshop by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: WorkshopId) -> Result<Option<Workshop>, RepositoryError> {
        let workshop = sqlx::query_as::<_, Workshop>(&format!(
            "SELECT {WORKSHOP_COLUMNS} FROM studio.workshops WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(workshop)
    }

    /// List all workshops, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Workshop>, RepositoryError> {
        let workshops = sqlx::query_as::<_, Workshop>(&format!(
            "SELECT {WORKSHOP_COLUMNS} FROM studio.workshops ORDER BY date ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(workshops)
    }

    /// Create a workshop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: WorkshopInput<'_>) -> Result<Workshop, RepositoryError> {
        let workshop = sqlx::query_as::<_, Workshop>(&format!(
            r"
            INSERT INTO studio.workshops (title, description, category, date, price, seats)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {WORKSHOP_COLUMNS}
            "
        ))
        .bind(input.title)
        .bind(input.description)
        .bind(input.category)
        .bind(input.date)
        .bind(input.price)
        .bind(input.seats)
        .fetch_one(self.pool)
        .await?;

        Ok(workshop)
    }

    /// Replace the mutable fields of a workshop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the workshop doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: WorkshopId,
        input: WorkshopInput<'_>,
    ) -> Result<Workshop, RepositoryError> {
        let workshop = sqlx::query_as::<_, Workshop>(&format!(
            r"
            UPDATE studio.workshops
            SET title = $2, description = $3, category = $4, date = $5, price = $6, seats = $7
            WHERE id = $1
            RETURNING {WORKSHOP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.category)
        .bind(input.date)
        .bind(input.price)
        .bind(input.seats)
        .fetch_optional(self.pool)
        .await?;

        workshop.ok_or(RepositoryError::NotFound)
    }

    /// Delete a workshop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the workshop doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: WorkshopId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM studio.workshops WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Number of registrations referencing a workshop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn registration_count(&self, id: WorkshopId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM studio.registrations WHERE workshop_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// List the registrations of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_registrations_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Registration>, RepositoryError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM studio.registrations \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(registrations)
    }

    /// List all registrations, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_registrations(&self) -> Result<Vec<Registration>, RepositoryError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM studio.registrations ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(registrations)
    }

    /// Create a registration and decrement the workshop's seats as one
    /// atomic unit.
    ///
    /// The insert runs first so a duplicate booking surfaces as `Conflict`
    /// before seat availability is considered; the decrement is conditional
    /// on `seats >= n` and rolls the insert back when it doesn't apply.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the (user, workshop) pair is
    /// already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn register(
        &self,
        new: NewRegistration<'_>,
    ) -> Result<RegisterOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r"
            INSERT INTO studio.registrations
                (user_id, workshop_id, workshop_title, contact_name, email, phone,
                 seats, payment, payment_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {REGISTRATION_COLUMNS}
            "
        ))
        .bind(new.user_id)
        .bind(new.workshop_id)
        .bind(new.workshop_title)
        .bind(new.contact_name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.seats)
        .bind(new.payment)
        .bind(new.payment_ref)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("already registered for this workshop".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let decremented = sqlx::query(
            r"
            UPDATE studio.workshops
            SET seats = seats - $2
            WHERE id = $1 AND seats >= $2
            ",
        )
        .bind(new.workshop_id)
        .bind(new.seats)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(RegisterOutcome::InsufficientSeats);
        }

        tx.commit().await?;

        Ok(RegisterOutcome::Registered(registration))
    }

    /// Delete a registration and restore exactly the seats it booked, as
    /// one atomic unit. Inverse of [`Self::register`].
    ///
    /// Returns the deleted registration, or `None` if there was nothing to
    /// cancel.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn cancel_registration(
        &self,
        user_id: UserId,
        workshop_id: WorkshopId,
    ) -> Result<Option<Registration>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r"
            DELETE FROM studio.registrations
            WHERE user_id = $1 AND workshop_id = $2
            RETURNING {REGISTRATION_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(workshop_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(registration) = registration else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE studio.workshops SET seats = seats + $2 WHERE id = $1")
            .bind(workshop_id)
            .bind(registration.seats)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(registration))
    }
}
