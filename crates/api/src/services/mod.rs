//! Business services.
//!
//! Each service is a thin, per-request construction over the repositories,
//! the way the route handlers consume them.

pub mod auth;
pub mod email;
pub mod orders;
pub mod otp;
pub mod payment;
pub mod workshops;

pub use auth::{AuthError, AuthService};
pub use email::EmailService;
pub use orders::{CancelActor, OrderError, OrderService, PlaceOrder};
pub use otp::{OtpError, OtpService};
pub use payment::{PaymentError, PaymentProof, PaymentVerifier};
pub use workshops::{WorkshopError, WorkshopService};
