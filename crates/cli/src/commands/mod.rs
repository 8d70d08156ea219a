//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

/// Errors shared across CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Password hashing error")]
    PasswordHash,
}

/// Connect to the studio database using `STUDIO_DATABASE_URL` (with a
/// `DATABASE_URL` fallback).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STUDIO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("STUDIO_DATABASE_URL"))?;

    Ok(PgPool::connect(&database_url).await?)
}
