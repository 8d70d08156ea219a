//! Workshop capacity manager.
//!
//! Seat accounting is delegated to the repository's transactional
//! register/cancel pair; this layer adds the payment gate for paid
//! workshops, the booking guard on admin edits, and the notifications.

use sqlx::PgPool;
use thiserror::Error;

use slipstone_core::{RegistrationPayment, WorkshopId};

use crate::db::workshops::{NewRegistration, WorkshopInput};
use crate::db::{RegisterOutcome, RepositoryError, WorkshopRepository};
use crate::models::{CurrentUser, Registration, Workshop};
use crate::services::email::{self, EmailService};
use crate::services::payment::{PaymentError, PaymentProof, PaymentVerifier};

/// Errors that can occur in workshop management.
#[derive(Debug, Error)]
pub enum WorkshopError {
    /// No such workshop.
    #[error("workshop not found")]
    NotFound,

    /// The user already holds a registration for this workshop.
    #[error("already registered for this workshop")]
    DuplicateRegistration,

    /// Fewer seats remain than were requested.
    #[error("not enough seats left")]
    InsufficientSeats,

    /// No registration exists to cancel.
    #[error("registration not found")]
    RegistrationNotFound,

    /// The workshop has live bookings and cannot be edited or deleted.
    #[error("workshop has existing bookings")]
    HasBookings,

    /// Payment gate failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// A required field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Workshop capacity service.
pub struct WorkshopService<'a> {
    workshops: WorkshopRepository<'a>,
    payments: &'a PaymentVerifier,
    email: &'a EmailService,
}

impl<'a> WorkshopService<'a> {
    /// Create a new workshop service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        payments: &'a PaymentVerifier,
        email: &'a EmailService,
    ) -> Self {
        Self {
            workshops: WorkshopRepository::new(pool),
            payments,
            email,
        }
    }

    /// Register the session user for a workshop.
    ///
    /// Paid workshops require a verified gateway transaction before any
    /// write happens. The registration insert and the seat decrement are
    /// one atomic unit; a losing concurrent caller gets
    /// `InsufficientSeats`, never an over-booked workshop.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::DuplicateRegistration`,
    /// `WorkshopError::InsufficientSeats`, or `WorkshopError::Payment` as
    /// described above.
    pub async fn register(
        &self,
        user: &CurrentUser,
        workshop_id: WorkshopId,
        seats: i32,
        payment: Option<&PaymentProof>,
    ) -> Result<Registration, WorkshopError> {
        if seats < 1 {
            return Err(WorkshopError::Validation(
                "must book at least one seat".to_owned(),
            ));
        }

        let workshop = self
            .workshops
            .get(workshop_id)
            .await?
            .ok_or(WorkshopError::NotFound)?;

        let (payment_status, payment_ref) = if workshop.is_paid() {
            let proof = payment.ok_or(PaymentError::MissingProof)?;
            self.payments.verify(proof)?;
            (RegistrationPayment::Paid, Some(proof.payment_ref.as_str()))
        } else {
            (RegistrationPayment::Free, None)
        };

        let outcome = self
            .workshops
            .register(NewRegistration {
                user_id: user.id,
                workshop_id,
                workshop_title: &workshop.title,
                contact_name: &user.name,
                email: &user.email,
                phone: None,
                seats,
                payment: payment_status,
                payment_ref,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => WorkshopError::DuplicateRegistration,
                other => WorkshopError::Repository(other),
            })?;

        let registration = match outcome {
            RegisterOutcome::Registered(registration) => registration,
            RegisterOutcome::InsufficientSeats => return Err(WorkshopError::InsufficientSeats),
        };

        tracing::info!(
            workshop_id = %workshop_id,
            user_id = %user.id,
            seats,
            "Workshop registration created"
        );

        let svc = self.email.clone();
        let to = registration.email.to_string();
        let name = registration.contact_name.clone();
        let title = registration.workshop_title.clone();
        let booked = registration.seats;
        email::dispatch(async move {
            svc.send_workshop_registration(&to, &name, &title, booked).await
        });

        Ok(registration)
    }

    /// Cancel the session user's registration for a workshop, restoring
    /// exactly the seats that were booked.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::RegistrationNotFound` if there is nothing to
    /// cancel.
    pub async fn cancel(
        &self,
        user: &CurrentUser,
        workshop_id: WorkshopId,
    ) -> Result<(), WorkshopError> {
        let registration = self
            .workshops
            .cancel_registration(user.id, workshop_id)
            .await?
            .ok_or(WorkshopError::RegistrationNotFound)?;

        tracing::info!(
            workshop_id = %workshop_id,
            user_id = %user.id,
            seats = registration.seats,
            "Workshop registration cancelled"
        );

        let svc = self.email.clone();
        let to = registration.email.to_string();
        let name = registration.contact_name.clone();
        let title = registration.workshop_title.clone();
        email::dispatch(async move { svc.send_workshop_cancelled(&to, &name, &title).await });

        Ok(())
    }

    /// Create a workshop (operations console).
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::Repository` if the insert fails.
    pub async fn create(&self, input: WorkshopInput<'_>) -> Result<Workshop, WorkshopError> {
        validate_input(&input)?;
        Ok(self.workshops.create(input).await?)
    }

    /// Edit a workshop. Rejected once anyone has booked: the seat counter
    /// would no longer be trustworthy after a unilateral edit.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::HasBookings` when registrations exist.
    pub async fn update(
        &self,
        id: WorkshopId,
        input: WorkshopInput<'_>,
    ) -> Result<Workshop, WorkshopError> {
        validate_input(&input)?;
        self.ensure_no_bookings(id).await?;

        self.workshops.update(id, input).await.map_err(|e| match e {
            RepositoryError::NotFound => WorkshopError::NotFound,
            other => WorkshopError::Repository(other),
        })
    }

    /// Delete a workshop. Same booking guard as [`Self::update`].
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::HasBookings` when registrations exist.
    pub async fn delete(&self, id: WorkshopId) -> Result<(), WorkshopError> {
        self.ensure_no_bookings(id).await?;

        self.workshops.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => WorkshopError::NotFound,
            other => WorkshopError::Repository(other),
        })
    }

    /// Get a single workshop.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::NotFound` if no such workshop exists.
    pub async fn get(&self, id: WorkshopId) -> Result<Workshop, WorkshopError> {
        self.workshops.get(id).await?.ok_or(WorkshopError::NotFound)
    }

    /// List all workshops.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Workshop>, WorkshopError> {
        Ok(self.workshops.list().await?)
    }

    /// List the session user's registrations.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::Repository` if the query fails.
    pub async fn my_registrations(
        &self,
        user: &CurrentUser,
    ) -> Result<Vec<Registration>, WorkshopError> {
        Ok(self.workshops.list_registrations_for_user(user.id).await?)
    }

    /// List all registrations (operations console).
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::Repository` if the query fails.
    pub async fn all_registrations(&self) -> Result<Vec<Registration>, WorkshopError> {
        Ok(self.workshops.list_registrations().await?)
    }

    async fn ensure_no_bookings(&self, id: WorkshopId) -> Result<(), WorkshopError> {
        if self.workshops.registration_count(id).await? > 0 {
            return Err(WorkshopError::HasBookings);
        }
        Ok(())
    }
}

fn validate_input(input: &WorkshopInput<'_>) -> Result<(), WorkshopError> {
    if input.title.trim().is_empty() {
        return Err(WorkshopError::Validation("title is required".to_owned()));
    }
    if input.seats < 0 {
        return Err(WorkshopError::Validation(
            "seat capacity cannot be negative".to_owned(),
        ));
    }
    if input.price < rust_decimal::Decimal::ZERO {
        return Err(WorkshopError::Validation("price cannot be negative".to_owned()));
    }
    Ok(())
}
