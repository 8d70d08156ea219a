//! Email service for one-time codes and order/workshop notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Every
//! notification here is fire-and-forget: callers commit their state change
//! first and hand the send to [`dispatch`], which logs failures and never
//! propagates them.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for one-time-code email.
#[derive(Template)]
#[template(path = "email/otp_code.html")]
struct OtpCodeEmailHtml<'a> {
    code: &'a str,
    action: &'a str,
}

/// Plain text template for one-time-code email.
#[derive(Template)]
#[template(path = "email/otp_code.txt")]
struct OtpCodeEmailText<'a> {
    code: &'a str,
    action: &'a str,
}

/// HTML template for order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationEmailHtml<'a> {
    name: &'a str,
    order_id: i32,
    amount: &'a str,
}

/// Plain text template for order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationEmailText<'a> {
    name: &'a str,
    order_id: i32,
    amount: &'a str,
}

/// HTML template for self-initiated cancellation email.
#[derive(Template)]
#[template(path = "email/order_cancelled_customer.html")]
struct OrderCancelledCustomerHtml<'a> {
    name: &'a str,
    order_id: i32,
}

/// Plain text template for self-initiated cancellation email.
#[derive(Template)]
#[template(path = "email/order_cancelled_customer.txt")]
struct OrderCancelledCustomerText<'a> {
    name: &'a str,
    order_id: i32,
}

/// HTML template for admin-initiated cancellation email.
#[derive(Template)]
#[template(path = "email/order_cancelled_admin.html")]
struct OrderCancelledAdminHtml<'a> {
    name: &'a str,
    order_id: i32,
}

/// Plain text template for admin-initiated cancellation email.
#[derive(Template)]
#[template(path = "email/order_cancelled_admin.txt")]
struct OrderCancelledAdminText<'a> {
    name: &'a str,
    order_id: i32,
}

/// HTML template for workshop registration email.
#[derive(Template)]
#[template(path = "email/workshop_registration.html")]
struct WorkshopRegistrationHtml<'a> {
    name: &'a str,
    title: &'a str,
    seats: i32,
}

/// Plain text template for workshop registration email.
#[derive(Template)]
#[template(path = "email/workshop_registration.txt")]
struct WorkshopRegistrationText<'a> {
    name: &'a str,
    title: &'a str,
    seats: i32,
}

/// HTML template for workshop cancellation email.
#[derive(Template)]
#[template(path = "email/workshop_cancelled.html")]
struct WorkshopCancelledHtml<'a> {
    name: &'a str,
    title: &'a str,
}

/// Plain text template for workshop cancellation email.
#[derive(Template)]
#[template(path = "email/workshop_cancelled.txt")]
struct WorkshopCancelledText<'a> {
    name: &'a str,
    title: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a one-time code.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_otp_code(
        &self,
        to: &str,
        code: &str,
        action: &str,
    ) -> Result<(), EmailError> {
        let html = OtpCodeEmailHtml { code, action }.render()?;
        let text = OtpCodeEmailText { code, action }.render()?;

        self.send_multipart_email(to, "Your Slipstone Ceramics verification code", &text, &html)
            .await
    }

    /// Send an order confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        name: &str,
        order_id: i32,
        amount: &str,
    ) -> Result<(), EmailError> {
        let html = OrderConfirmationEmailHtml {
            name,
            order_id,
            amount,
        }
        .render()?;
        let text = OrderConfirmationEmailText {
            name,
            order_id,
            amount,
        }
        .render()?;

        self.send_multipart_email(to, "Your Slipstone Ceramics order is confirmed", &text, &html)
            .await
    }

    /// Send an order cancellation notice; the wording differs depending on
    /// whether the customer or the studio cancelled.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_order_cancelled(
        &self,
        to: &str,
        name: &str,
        order_id: i32,
        by_admin: bool,
    ) -> Result<(), EmailError> {
        let (text, html) = if by_admin {
            (
                OrderCancelledAdminText { name, order_id }.render()?,
                OrderCancelledAdminHtml { name, order_id }.render()?,
            )
        } else {
            (
                OrderCancelledCustomerText { name, order_id }.render()?,
                OrderCancelledCustomerHtml { name, order_id }.render()?,
            )
        };

        self.send_multipart_email(to, "Your Slipstone Ceramics order was cancelled", &text, &html)
            .await
    }

    /// Send a workshop registration confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_workshop_registration(
        &self,
        to: &str,
        name: &str,
        title: &str,
        seats: i32,
    ) -> Result<(), EmailError> {
        let html = WorkshopRegistrationHtml { name, title, seats }.render()?;
        let text = WorkshopRegistrationText { name, title, seats }.render()?;

        self.send_multipart_email(to, "You're booked for a Slipstone workshop", &text, &html)
            .await
    }

    /// Send a workshop cancellation notice.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_workshop_cancelled(
        &self,
        to: &str,
        name: &str,
        title: &str,
    ) -> Result<(), EmailError> {
        let html = WorkshopCancelledHtml { name, title }.render()?;
        let text = WorkshopCancelledText { name, title }.render()?;

        self.send_multipart_email(to, "Your Slipstone workshop booking was cancelled", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Run an email send in the background, decoupled from the caller.
///
/// The triggering state transition has already committed by the time this
/// is called; a send failure is logged and affects nothing else.
pub fn dispatch<F>(send: F)
where
    F: Future<Output = Result<(), EmailError>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = send.await {
            tracing::warn!(error = %e, "Email dispatch failed");
        }
    });
}
