//! Domain models backed by the `studio` schema.

pub mod content;
pub mod order;
pub mod product;
pub mod session;
pub mod user;
pub mod workshop;

pub use content::{CorporateInquiry, News, Testimonial};
pub use order::{CustomDetails, Order, ShippingAddress};
pub use product::Product;
pub use session::{CurrentUser, session_keys};
pub use user::User;
pub use workshop::{Registration, Workshop};
