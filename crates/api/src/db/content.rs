//! Content and inquiry repositories.
//!
//! News, testimonials, and corporate inquiries have no lifecycle beyond
//! existence, so each repository is the same create/list/delete shape.

use sqlx::PgPool;

use slipstone_core::{Email, InquiryId, NewsId, TestimonialId};

use super::RepositoryError;
use crate::models::{CorporateInquiry, News, Testimonial};

/// Repository for news posts.
pub struct NewsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all news posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<News>, RepositoryError> {
        let rows = sqlx::query_as::<_, News>(
            "SELECT id, title, body, created_at FROM studio.news ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a news post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, title: &str, body: &str) -> Result<News, RepositoryError> {
        let row = sqlx::query_as::<_, News>(
            r"
            INSERT INTO studio.news (title, body)
            VALUES ($1, $2)
            RETURNING id, title, body, created_at
            ",
        )
        .bind(title)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a news post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: NewsId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM studio.news WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Repository for customer testimonials.
pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all testimonials, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(
            "SELECT id, author, quote, created_at FROM studio.testimonials \
             ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a testimonial.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, author: &str, quote: &str) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(
            r"
            INSERT INTO studio.testimonials (author, quote)
            VALUES ($1, $2)
            RETURNING id, author, quote, created_at
            ",
        )
        .bind(author)
        .bind(quote)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a testimonial.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the testimonial doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: TestimonialId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM studio.testimonials WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Repository for corporate-gifting inquiries.
pub struct InquiryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InquiryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all inquiries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CorporateInquiry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CorporateInquiry>(
            "SELECT id, company, contact_name, email, message, created_at \
             FROM studio.corporate_inquiries ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create an inquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        company: &str,
        contact_name: &str,
        email: &Email,
        message: &str,
    ) -> Result<CorporateInquiry, RepositoryError> {
        let row = sqlx::query_as::<_, CorporateInquiry>(
            r"
            INSERT INTO studio.corporate_inquiries (company, contact_name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company, contact_name, email, message, created_at
            ",
        )
        .bind(company)
        .bind(contact_name)
        .bind(email)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete an inquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the inquiry doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: InquiryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM studio.corporate_inquiries WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
