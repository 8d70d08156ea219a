//! User repository.
//!
//! Besides account CRUD this owns the one-time-code slot: a user has at
//! most one outstanding code, and clearing it is conditional on the code
//! still matching so a code can never be consumed twice.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use slipstone_core::{Email, OtpPurpose, UserId, UserRole};

use super::RepositoryError;
use crate::models::User;

const USER_COLUMNS: &str =
    "id, name, email, role, is_verified, phone, address, city, zip, created_at, updated_at";

/// A new account to be inserted.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub zip: Option<&'a str>,
}

/// The stored one-time-code slot of a user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredOtp {
    pub otp_code: String,
    pub otp_purpose: OtpPurpose,
    pub otp_expires_at: DateTime<Utc>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM studio.users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewUser<'_>) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO studio.users (name, email, password_hash, role, phone, address, city, zip)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .bind(new.phone)
        .bind(new.address)
        .bind(new.city)
        .bind(new.zip)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM studio.users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Mark a user's email as verified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_verified(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE studio.users SET is_verified = TRUE, updated_at = now() WHERE id = $1")
                .bind(user_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Store a one-time code on the user record, overwriting any
    /// previously outstanding code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_otp(
        &self,
        user_id: UserId,
        code: &str,
        purpose: OtpPurpose,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE studio.users
            SET otp_code = $2, otp_purpose = $3, otp_expires_at = $4, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .bind(code)
        .bind(purpose)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Fetch the outstanding one-time code of a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_otp(&self, user_id: UserId) -> Result<Option<StoredOtp>, RepositoryError> {
        let slot = sqlx::query_as::<_, StoredOtp>(
            r"
            SELECT otp_code, otp_purpose, otp_expires_at
            FROM studio.users
            WHERE id = $1 AND otp_code IS NOT NULL
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(slot)
    }

    /// Clear the one-time code, but only if it still matches `code`.
    ///
    /// Returns `true` when this call consumed the code. A `false` return
    /// means another request already consumed or replaced it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_otp_if_matches(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE studio.users
            SET otp_code = NULL, otp_purpose = NULL, otp_expires_at = NULL, updated_at = now()
            WHERE id = $1 AND otp_code = $2
            ",
        )
        .bind(user_id)
        .bind(code)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Internal row pairing a user with their credential hash.
#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}
