//! Database migration command.
//!
//! Applies the SQL migrations embedded from `crates/api/migrations/`.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails to apply.
pub async fn run() -> Result<(), CommandError> {
    tracing::info!("Connecting to studio database...");
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
