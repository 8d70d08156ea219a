//! Content and inquiry records: created, listed, deleted. No lifecycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use slipstone_core::{Email, InquiryId, NewsId, TestimonialId};

/// A studio news post.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct News {
    pub id: NewsId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A customer testimonial.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub author: String,
    pub quote: String,
    pub created_at: DateTime<Utc>,
}

/// A corporate-gifting inquiry from the contact funnel.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CorporateInquiry {
    pub id: InquiryId,
    pub company: String,
    pub contact_name: String,
    pub email: Email,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
