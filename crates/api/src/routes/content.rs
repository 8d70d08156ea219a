//! Content and inquiry route handlers.
//!
//! Plain create/list/delete plumbing. Mutations are admin-gated except the
//! corporate-inquiry funnel, which is the one public write.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use slipstone_core::{Email, InquiryId, NewsId, TestimonialId};

use crate::db::{InquiryRepository, NewsRepository, TestimonialRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// News post body.
#[derive(Debug, Deserialize)]
pub struct NewsRequest {
    pub title: String,
    pub body: String,
}

/// Testimonial body.
#[derive(Debug, Deserialize)]
pub struct TestimonialRequest {
    pub author: String,
    pub quote: String,
}

/// Corporate inquiry body.
#[derive(Debug, Deserialize)]
pub struct InquiryRequest {
    pub company: String,
    pub contact_name: String,
    pub email: String,
    pub message: String,
}

// =============================================================================
// News
// =============================================================================

/// Public news listing.
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Value>> {
    let news = NewsRepository::new(state.pool()).list().await?;
    Ok(Json(json!({ "news": news })))
}

/// Create a news post.
pub async fn create_news(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<NewsRequest>,
) -> Result<Json<Value>> {
    let news = NewsRepository::new(state.pool())
        .create(&body.title, &body.body)
        .await?;
    Ok(Json(json!({ "news": news })))
}

/// Delete a news post.
pub async fn delete_news(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    NewsRepository::new(state.pool())
        .delete(NewsId::new(id))
        .await
        .map_err(not_found_or_db("news post not found"))?;
    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Testimonials
// =============================================================================

/// Public testimonial listing.
pub async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Value>> {
    let testimonials = TestimonialRepository::new(state.pool()).list().await?;
    Ok(Json(json!({ "testimonials": testimonials })))
}

/// Create a testimonial.
pub async fn create_testimonial(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<TestimonialRequest>,
) -> Result<Json<Value>> {
    let testimonial = TestimonialRepository::new(state.pool())
        .create(&body.author, &body.quote)
        .await?;
    Ok(Json(json!({ "testimonial": testimonial })))
}

/// Delete a testimonial.
pub async fn delete_testimonial(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    TestimonialRepository::new(state.pool())
        .delete(TestimonialId::new(id))
        .await
        .map_err(not_found_or_db("testimonial not found"))?;
    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Corporate inquiries
// =============================================================================

/// Public corporate-inquiry funnel.
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(body): Json<InquiryRequest>,
) -> Result<Json<Value>> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("message is required".to_owned()));
    }

    let inquiry = InquiryRepository::new(state.pool())
        .create(&body.company, &body.contact_name, &email, &body.message)
        .await?;

    Ok(Json(json!({ "success": true, "inquiry": inquiry })))
}

/// All inquiries, for the operations console.
pub async fn list_inquiries(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let inquiries = InquiryRepository::new(state.pool()).list().await?;
    Ok(Json(json!({ "inquiries": inquiries })))
}

/// Delete an inquiry.
pub async fn delete_inquiry(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    InquiryRepository::new(state.pool())
        .delete(InquiryId::new(id))
        .await
        .map_err(not_found_or_db("inquiry not found"))?;
    Ok(Json(json!({ "success": true })))
}

fn not_found_or_db(msg: &'static str) -> impl Fn(crate::db::RepositoryError) -> AppError {
    move |e| match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound(msg.to_owned()),
        other => AppError::Database(other),
    }
}
