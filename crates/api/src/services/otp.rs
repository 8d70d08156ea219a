//! One-time-code issuance and consumption.
//!
//! Every sensitive action (email verification, checkout, cancellation) is
//! gated by a purpose-scoped 6-digit code. A user has a single code slot:
//! issuing a new code overwrites the old one, and consumption is an atomic
//! conditional clear, so a code is usable exactly once.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use slipstone_core::{Email, OtpPurpose};

use crate::db::users::StoredOtp;
use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// How long an issued code stays valid.
const OTP_VALIDITY_MINUTES: i64 = 10;

/// Errors that can occur during OTP operations.
#[derive(Debug, Error)]
pub enum OtpError {
    /// No account exists for the given email.
    #[error("no account found for this email")]
    UserNotFound,

    /// The code does not match the outstanding one (or there is none, or
    /// it was issued for a different action).
    #[error("invalid one-time code")]
    InvalidCode,

    /// The code matched but its validity window has passed.
    #[error("one-time code has expired")]
    ExpiredCode,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// An issued code, returned so the caller can hand it to the email service.
#[derive(Debug)]
pub struct IssuedOtp {
    pub user: User,
    pub code: String,
}

/// One-time-code service.
pub struct OtpService<'a> {
    users: UserRepository<'a>,
}

impl<'a> OtpService<'a> {
    /// Create a new OTP service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Issue a fresh code for `purpose`, overwriting any outstanding code.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::UserNotFound` if no account matches the email.
    pub async fn issue(&self, email: &Email, purpose: OtpPurpose) -> Result<IssuedOtp, OtpError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(OtpError::UserNotFound)?;

        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(OTP_VALIDITY_MINUTES);

        self.users
            .set_otp(user.id, &code, purpose, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, purpose = ?purpose, "One-time code issued");

        Ok(IssuedOtp { user, code })
    }

    /// Consume the outstanding code of the account behind `email`.
    ///
    /// The candidate must match the stored code, the stored purpose must
    /// match `purpose`, and the validity window must still be open. On
    /// success the slot is cleared; a concurrent consumer losing the race
    /// sees `InvalidCode`.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::UserNotFound`, `OtpError::InvalidCode`, or
    /// `OtpError::ExpiredCode` as described above.
    pub async fn consume(
        &self,
        email: &Email,
        purpose: OtpPurpose,
        candidate: &str,
    ) -> Result<User, OtpError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(OtpError::UserNotFound)?;

        let stored = self.users.get_otp(user.id).await?.ok_or(OtpError::InvalidCode)?;

        validate_slot(&stored, purpose, candidate, Utc::now())?;

        // Single use: only the request that clears the slot wins.
        if !self.users.clear_otp_if_matches(user.id, candidate).await? {
            return Err(OtpError::InvalidCode);
        }

        Ok(user)
    }
}

/// Check a candidate code against the stored slot.
///
/// Purpose and value must both match before expiry is even considered; a
/// mismatched code reveals nothing about whether one is outstanding.
fn validate_slot(
    stored: &StoredOtp,
    purpose: OtpPurpose,
    candidate: &str,
    now: DateTime<Utc>,
) -> Result<(), OtpError> {
    if stored.otp_purpose != purpose || stored.otp_code != candidate {
        return Err(OtpError::InvalidCode);
    }

    if stored.otp_expires_at < now {
        return Err(OtpError::ExpiredCode);
    }

    Ok(())
}

/// Generate a 6-digit one-time code.
#[must_use]
pub fn generate_code() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

/// Human phrasing of an OTP purpose, used in the code email.
#[must_use]
pub const fn purpose_action(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::VerifyEmail => "verify your email address",
        OtpPurpose::PlaceOrder => "confirm your order",
        OtpPurpose::CancelOrder => "confirm the cancellation of your order",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_format() {
        let code = generate_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_code_range() {
        for _ in 0..100 {
            let code: u32 = generate_code().parse().expect("valid number");
            assert!(code >= 100_000);
            assert!(code < 1_000_000);
        }
    }

    #[test]
    fn test_purpose_action_wording_differs() {
        assert_ne!(
            purpose_action(OtpPurpose::PlaceOrder),
            purpose_action(OtpPurpose::CancelOrder)
        );
    }

    fn slot(code: &str, purpose: OtpPurpose, expires_in_minutes: i64) -> StoredOtp {
        StoredOtp {
            otp_code: code.to_string(),
            otp_purpose: purpose,
            otp_expires_at: Utc::now() + Duration::minutes(expires_in_minutes),
        }
    }

    #[test]
    fn test_validate_slot_accepts_matching_code() {
        let stored = slot("482913", OtpPurpose::PlaceOrder, 10);
        assert!(validate_slot(&stored, OtpPurpose::PlaceOrder, "482913", Utc::now()).is_ok());
    }

    #[test]
    fn test_validate_slot_rejects_wrong_code() {
        let stored = slot("482913", OtpPurpose::PlaceOrder, 10);
        assert!(matches!(
            validate_slot(&stored, OtpPurpose::PlaceOrder, "000000", Utc::now()),
            Err(OtpError::InvalidCode)
        ));
    }

    #[test]
    fn test_validate_slot_rejects_cross_purpose_replay() {
        // A checkout code must not satisfy a cancellation.
        let stored = slot("482913", OtpPurpose::PlaceOrder, 10);
        assert!(matches!(
            validate_slot(&stored, OtpPurpose::CancelOrder, "482913", Utc::now()),
            Err(OtpError::InvalidCode)
        ));
    }

    #[test]
    fn test_validate_slot_rejects_expired_code() {
        // Value matches, validity window has passed.
        let stored = slot("482913", OtpPurpose::PlaceOrder, -1);
        assert!(matches!(
            validate_slot(&stored, OtpPurpose::PlaceOrder, "482913", Utc::now()),
            Err(OtpError::ExpiredCode)
        ));
    }
}
