//! Admin account management.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use super::{CommandError, connect};

/// Create an admin account, pre-verified.
///
/// # Errors
///
/// Returns `CommandError` if hashing fails or the insert is rejected
/// (e.g. the email is already taken).
pub async fn create_admin(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| CommandError::PasswordHash)?
        .to_string();

    sqlx::query(
        r"
        INSERT INTO studio.users (name, email, password_hash, role, is_verified)
        VALUES ($1, $2, $3, 'admin', TRUE)
        ",
    )
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    tracing::info!(email, "Admin account created");
    Ok(())
}
