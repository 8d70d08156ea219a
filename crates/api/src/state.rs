//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StudioConfig;
use crate::services::{EmailService, PaymentVerifier};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the pool, configuration,
/// and the long-lived service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StudioConfig,
    pool: PgPool,
    email: EmailService,
    payments: PaymentVerifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn new(
        config: StudioConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let email = EmailService::new(&config.email)?;
        let payments = PaymentVerifier::new(&config.payment);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                payments,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Get a reference to the payment verifier.
    #[must_use]
    pub fn payments(&self) -> &PaymentVerifier {
        &self.inner.payments
    }
}
