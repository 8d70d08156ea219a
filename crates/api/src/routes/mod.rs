//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /auth/register          - Create account, returns {step: OTP_SENT}
//! POST /auth/verify-register   - Confirm the verify-email code
//! POST /auth/login             - Password login, sets session cookie
//! POST /auth/logout            - Clear session
//! POST /auth/req-otp           - Issue a one-time code for an action
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//! POST /products               - Create product (admin)
//! PUT  /products/{id}          - Update product (admin)
//! DELETE /products/{id}        - Delete product (admin)
//!
//! # Orders
//! GET  /payment/config         - Gateway key id for the checkout widget
//! POST /buy                    - OTP-gated checkout (standard or custom)
//! GET  /orders                 - All orders (admin)
//! GET  /orders/{id}            - Order detail (admin)
//! GET  /orders/user/{user_id}  - Order history (owner or admin)
//! POST /orders/{id}/cancel     - Cancel (customer: OTP; admin session: bypass)
//! PUT  /orders/{id}/tracking   - Advance tracking one stage (admin)
//!
//! # Workshops
//! GET  /workshops              - Workshop listing
//! GET  /workshops/{id}         - Workshop detail
//! POST /workshops              - Create workshop (admin)
//! PUT  /workshops/{id}         - Update workshop (admin, rejected once booked)
//! DELETE /workshops/{id}       - Delete workshop (admin, rejected once booked)
//! POST /workshops/register     - Book seats (session user)
//! POST /workshops/cancel       - Release a booking (session user)
//! GET  /workshops/my-registrations - Session user's bookings
//! GET  /workshops/registrations    - All bookings (admin)
//!
//! # Content
//! GET/POST /news, DELETE /news/{id}                 (mutations admin)
//! GET/POST /testimonials, DELETE /testimonials/{id} (mutations admin)
//! POST /corporate-inquiries                         (public funnel)
//! GET /corporate-inquiries, DELETE /corporate-inquiries/{id} (admin)
//! ```

pub mod auth;
pub mod content;
pub mod orders;
pub mod products;
pub mod workshops;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Assemble the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(product_routes())
        .merge(order_routes())
        .nest("/workshops", workshop_routes())
        .merge(content_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/verify-register", post(auth::verify_register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/req-otp", post(auth::request_otp))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get_one)
                .put(products::update)
                .delete(products::remove),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/buy", post(orders::buy))
        .route("/payment/config", get(orders::payment_config))
        .route("/orders", get(orders::list_all))
        .route("/orders/{id}", get(orders::get_one))
        .route("/orders/user/{user_id}", get(orders::list_for_user))
        .route("/orders/{id}/cancel", post(orders::cancel))
        .route("/orders/{id}/tracking", put(orders::update_tracking))
}

fn workshop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(workshops::list).post(workshops::create))
        .route("/register", post(workshops::register))
        .route("/cancel", post(workshops::cancel))
        .route("/my-registrations", get(workshops::my_registrations))
        .route("/registrations", get(workshops::all_registrations))
        .route(
            "/{id}",
            get(workshops::get_one)
                .put(workshops::update)
                .delete(workshops::remove),
        )
}

fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(content::list_news).post(content::create_news))
        .route("/news/{id}", delete(content::delete_news))
        .route(
            "/testimonials",
            get(content::list_testimonials).post(content::create_testimonial),
        )
        .route("/testimonials/{id}", delete(content::delete_testimonial))
        .route(
            "/corporate-inquiries",
            get(content::list_inquiries).post(content::create_inquiry),
        )
        .route("/corporate-inquiries/{id}", delete(content::delete_inquiry))
}
