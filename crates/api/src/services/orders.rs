//! Order lifecycle manager.
//!
//! Owns the one real state machine in the system: OTP-gated placement,
//! strict single-step tracking advancement, and one-way cancellation with
//! an admin bypass of the second factor.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use slipstone_core::{Email, OrderId, OrderKind, OtpPurpose, ProductId, TrackingStage};

use crate::db::orders::NewOrder;
use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::models::{CustomDetails, Order, ShippingAddress};
use crate::services::email::{self, EmailService};
use crate::services::otp::{OtpError, OtpService};
use crate::services::payment::{PaymentError, PaymentProof, PaymentVerifier};

/// Errors that can occur in the order lifecycle.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No such order.
    #[error("order not found")]
    NotFound,

    /// OTP gate failed.
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// Payment gate failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The order is already cancelled; no further mutation is permitted.
    #[error("order is already cancelled")]
    AlreadyCancelled,

    /// The order has reached the terminal tracking stage.
    #[error("order has already been delivered")]
    AlreadyDelivered,

    /// The requested tracking stage is not the immediate next one.
    #[error("tracking can only move to the immediate next stage")]
    InvalidSequence,

    /// A required field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A checkout request, already shape-validated by the route layer.
#[derive(Debug)]
pub struct PlaceOrder {
    pub email: Email,
    pub otp: String,
    pub kind: OrderKind,
    /// Catalog product for standard orders.
    pub product_id: Option<ProductId>,
    pub amount: Decimal,
    pub customer_name: String,
    pub phone: String,
    pub shipping: ShippingAddress,
    pub payment: Option<PaymentProof>,
    pub custom: Option<CustomDetails>,
}

/// Who is asking for a cancellation.
#[derive(Debug)]
pub enum CancelActor {
    /// A customer; must pass the OTP gate.
    Customer { email: Email, otp: String },
    /// An operations-console admin; the session is the trust boundary, no
    /// second factor.
    Admin,
}

/// Order lifecycle service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    products: ProductRepository<'a>,
    otp: OtpService<'a>,
    payments: &'a PaymentVerifier,
    email: &'a EmailService,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        payments: &'a PaymentVerifier,
        email: &'a EmailService,
    ) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            products: ProductRepository::new(pool),
            otp: OtpService::new(pool),
            payments,
            email,
        }
    }

    /// Place an order.
    ///
    /// Gates, in sequence: OTP (purpose `PlaceOrder`), then payment
    /// signature for paid standard orders. Custom and zero-amount orders
    /// carry no payment at creation time. The order row is the durable
    /// side effect; the confirmation email is dispatched after the insert
    /// and never rolls it back.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Otp`, `OrderError::Payment`, or
    /// `OrderError::Validation` when a gate fails; the order is not
    /// persisted in any failure case.
    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, OrderError> {
        if request.amount < Decimal::ZERO {
            return Err(OrderError::Validation("amount cannot be negative".to_owned()));
        }
        if request.kind == OrderKind::Custom
            && !request
                .custom
                .as_ref()
                .is_some_and(|c| !c.description.trim().is_empty())
        {
            return Err(OrderError::Validation(
                "custom orders need a description".to_owned(),
            ));
        }

        // Resolve the product before the OTP gate; a rejected product id
        // leaves the code unconsumed.
        let product_name = match request.product_id {
            Some(product_id) => Some(
                self.products
                    .get(product_id)
                    .await?
                    .ok_or_else(|| OrderError::Validation("unknown product".to_owned()))?
                    .name,
            ),
            None => None,
        };

        let user = self
            .otp
            .consume(&request.email, OtpPurpose::PlaceOrder, &request.otp)
            .await?;

        // Paid standard orders must present a verifiable gateway
        // transaction; everything else skips the payment gate.
        let payment_ref = if request.kind == OrderKind::Standard && request.amount > Decimal::ZERO {
            let proof = request.payment.as_ref().ok_or(PaymentError::MissingProof)?;
            self.payments.verify(proof)?;
            Some(proof.payment_ref.as_str())
        } else {
            None
        };

        let custom = request.custom.as_ref();
        let order = self
            .orders
            .create(NewOrder {
                user_id: Some(user.id),
                product_id: request.product_id,
                product_name: product_name.as_deref(),
                customer_name: &request.customer_name,
                email: &request.email,
                phone: &request.phone,
                address: &request.shipping.address,
                city: &request.shipping.city,
                zip: &request.shipping.zip,
                amount: request.amount,
                kind: request.kind,
                payment_ref,
                custom_description: custom.map(|c| c.description.as_str()),
                custom_material: custom.and_then(|c| c.material.as_deref()),
                reference_images: custom.map_or(&[][..], |c| &c.reference_images),
            })
            .await?;

        tracing::info!(order_id = %order.id, kind = ?order.kind, "Order placed");

        let svc = self.email.clone();
        let to = order.email.to_string();
        let name = order.customer_name.clone();
        let id = order.id.as_i32();
        let amount = order.amount.to_string();
        email::dispatch(async move { svc.send_order_confirmation(&to, &name, id, &amount).await });

        Ok(order)
    }

    /// Advance an order's tracking stage.
    ///
    /// Strict single-step, forward-only: `requested` must be exactly the
    /// successor of the current stage. Cancelled orders are frozen.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AlreadyCancelled`, `OrderError::AlreadyDelivered`,
    /// or `OrderError::InvalidSequence` as described above.
    pub async fn advance_tracking(
        &self,
        order_id: OrderId,
        requested: TrackingStage,
    ) -> Result<(), OrderError> {
        let order = self.orders.get(order_id).await?.ok_or(OrderError::NotFound)?;

        if order.is_cancelled() {
            return Err(OrderError::AlreadyCancelled);
        }
        if order.tracking.is_terminal() {
            return Err(OrderError::AlreadyDelivered);
        }
        if !order.tracking.can_advance_to(requested) {
            return Err(OrderError::InvalidSequence);
        }

        // Conditional update: if another writer touched the order since the
        // read above, nothing matches and the request is rejected.
        let updated = self
            .orders
            .advance_tracking(order_id, order.tracking, requested)
            .await?;

        if !updated {
            return Err(OrderError::InvalidSequence);
        }

        tracing::info!(order_id = %order_id, stage = %requested, "Tracking advanced");
        Ok(())
    }

    /// Cancel an order.
    ///
    /// Customers must pass the OTP gate (purpose `CancelOrder`) and can
    /// only cancel their own orders; admins bypass both. Cancellation of an
    /// already-cancelled order is rejected, not silently accepted.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AlreadyCancelled` on repeat cancellation,
    /// `OrderError::Otp` when the customer gate fails.
    pub async fn cancel_order(
        &self,
        order_id: OrderId,
        actor: CancelActor,
    ) -> Result<(), OrderError> {
        let order = self.orders.get(order_id).await?.ok_or(OrderError::NotFound)?;

        if order.is_cancelled() {
            return Err(OrderError::AlreadyCancelled);
        }

        let by_admin = match actor {
            CancelActor::Admin => true,
            CancelActor::Customer { email, otp } => {
                if email != order.email {
                    return Err(OrderError::Validation(
                        "order does not belong to this customer".to_owned(),
                    ));
                }
                self.otp.consume(&email, OtpPurpose::CancelOrder, &otp).await?;
                false
            }
        };

        if !self.orders.cancel(order_id).await? {
            // Lost a race against another cancellation.
            return Err(OrderError::AlreadyCancelled);
        }

        tracing::info!(order_id = %order_id, by_admin, "Order cancelled");

        let svc = self.email.clone();
        let to = order.email.to_string();
        let name = order.customer_name.clone();
        let id = order.id.as_i32();
        email::dispatch(async move { svc.send_order_cancelled(&to, &name, id, by_admin).await });

        Ok(())
    }

    /// Get a single order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists.
    pub async fn get(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(order_id).await?.ok_or(OrderError::NotFound)
    }

    /// List every order (operations console).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list().await?)
    }

    /// List the orders of one user.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: slipstone_core::UserId,
    ) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }
}
