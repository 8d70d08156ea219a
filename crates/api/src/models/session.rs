//! Session-stored identity.

use serde::{Deserialize, Serialize};

use slipstone_core::{Email, UserId, UserRole};

/// Session storage keys.
pub mod session_keys {
    /// Key under which the authenticated user is stored.
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated identity carried in the session cookie.
///
/// This is the only identity the server trusts; anything the client asserts
/// in a request body (emails, role flags) is re-validated against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether this session belongs to an operations-console admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_roundtrip() {
        let user = CurrentUser {
            id: UserId::new(1),
            name: "Alice".to_string(),
            email: Email::parse("alice@example.com").unwrap(),
            role: UserRole::Customer,
        };

        let json = serde_json::to_string(&user).unwrap();
        let back: CurrentUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, user.id);
        assert!(!back.is_admin());
    }
}
