//! Demo data seeding for local development.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use slipstone_core::WorkshopCategory;

use super::{CommandError, connect};

/// Insert a small demo catalog and a pair of upcoming workshops.
///
/// Idempotency is not attempted; run against a fresh database.
///
/// # Errors
///
/// Returns `CommandError` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let products: [(&str, &str, Decimal); 3] = [
        (
            "Speckled stoneware mug",
            "Wheel-thrown, 350ml, dishwasher safe.",
            Decimal::new(2800, 2),
        ),
        (
            "Nesting bowl set",
            "Three bowls in a warm oatmeal glaze.",
            Decimal::new(9500, 2),
        ),
        (
            "Bud vase",
            "Hand-pinched, each one slightly different.",
            Decimal::new(2200, 2),
        ),
    ];

    for (name, description, price) in products {
        sqlx::query(
            "INSERT INTO studio.products (name, description, price) VALUES ($1, $2, $3)",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(&pool)
        .await?;
    }

    sqlx::query(
        r"
        INSERT INTO studio.workshops (title, description, category, date, price, seats)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind("Hand-throwing Basics")
    .bind("A first session at the wheel. Clay, tools, and firing included.")
    .bind(WorkshopCategory::Group)
    .bind(Utc::now() + Duration::days(21))
    .bind(Decimal::new(6500, 2))
    .bind(8)
    .execute(&pool)
    .await?;

    sqlx::query(
        r"
        INSERT INTO studio.workshops (title, description, category, date, price, seats)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind("Open studio evening")
    .bind("Bring a project, use the space and kilns.")
    .bind(WorkshopCategory::Group)
    .bind(Utc::now() + Duration::days(7))
    .bind(Decimal::ZERO)
    .bind(12)
    .execute(&pool)
    .await?;

    tracing::info!("Seed data inserted");
    Ok(())
}
