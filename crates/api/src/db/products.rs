//! Catalog product repository.

use sqlx::PgPool;

use slipstone_core::ProductId;

use super::RepositoryError;
use crate::models::Product;
use rust_decimal::Decimal;

const PRODUCT_COLUMNS: &str = "id, name, description, price, image_url, created_at";

/// Product fields supplied by the operations console.
#[derive(Debug)]
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub image_url: Option<&'a str>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM studio.products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM studio.products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: ProductInput<'_>) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO studio.products (name, description, price, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace the fields of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: ProductInput<'_>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE studio.products
            SET name = $2, description = $3, price = $4, image_url = $5
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.image_url)
        .fetch_optional(self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM studio.products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
