//! Status enums for the order, workshop, and OTP domains.
//!
//! The tracking-stage progression is the one real state machine in the
//! system, so its legality rules live here on the enum rather than at the
//! call sites that mutate orders.
//!
//! All enums are stored as snake_case text columns; the `pg_text_enum!`
//! macro wires up the sqlx codec (with the `postgres` feature) by
//! delegating to `TEXT`, the same way [`crate::Email`] does.

use serde::{Deserialize, Serialize};

/// Implement `as_db_str`/`from_db_str` and the sqlx `TEXT`-delegating
/// codec for a fieldless enum.
macro_rules! pg_text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// The snake_case database representation.
            #[must_use]
            pub const fn as_db_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Parse the database representation.
            ///
            /// # Errors
            ///
            /// Returns the unrecognized input on failure.
            pub fn from_db_str(s: &str) -> Result<Self, String> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), ": {}"),
                        other
                    )),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Self::from_db_str(s).map_err(Into::into)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(
                    &self.as_db_str(),
                    buf,
                )
            }
        }
    };
}

/// Order lifecycle status.
///
/// `Cancelled` is terminal: no field of a cancelled order may be mutated,
/// including its tracking stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Confirmed,
    Cancelled,
}

pg_text_enum!(OrderStatus {
    Confirmed => "confirmed",
    Cancelled => "cancelled",
});

/// Order kind: catalog purchase vs bespoke request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    #[default]
    Standard,
    Custom,
}

pg_text_enum!(OrderKind {
    Standard => "standard",
    Custom => "custom",
});

/// Delivery-progress axis, independent of cancellation.
///
/// Stages form a strict total order and may only be advanced one step at a
/// time, forward only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum TrackingStage {
    #[default]
    #[serde(rename = "Processing")]
    Processing,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Reached at final station")]
    ReachedFinalStation,
    #[serde(rename = "Out for delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
}

pg_text_enum!(TrackingStage {
    Processing => "processing",
    Shipped => "shipped",
    ReachedFinalStation => "reached_final_station",
    OutForDelivery => "out_for_delivery",
    Delivered => "delivered",
});

impl TrackingStage {
    /// All stages in delivery order.
    pub const ALL: [Self; 5] = [
        Self::Processing,
        Self::Shipped,
        Self::ReachedFinalStation,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// The immediate successor stage, or `None` at the terminal stage.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::ReachedFinalStation),
            Self::ReachedFinalStation => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether `target` is a legal single-step advancement from `self`.
    ///
    /// No skipping, no going backward.
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Whether this is the terminal stage.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Human-readable stage label, as shown to customers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::ReachedFinalStation => "Reached at final station",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for TrackingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

pg_text_enum!(UserRole {
    Customer => "customer",
    Admin => "admin",
});

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Workshop category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkshopCategory {
    #[default]
    Group,
    OneOnOne,
}

pg_text_enum!(WorkshopCategory {
    Group => "group",
    OneOnOne => "one_on_one",
});

/// Payment status snapshot carried on a workshop registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationPayment {
    Paid,
    Free,
}

pg_text_enum!(RegistrationPayment {
    Paid => "paid",
    Free => "free",
});

/// The action a one-time code is scoped to.
///
/// A code issued for one purpose cannot be replayed against another
/// OTP-gated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    VerifyEmail,
    #[default]
    PlaceOrder,
    CancelOrder,
}

pg_text_enum!(OtpPurpose {
    VerifyEmail => "verify_email",
    PlaceOrder => "place_order",
    CancelOrder => "cancel_order",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_stage_total_order() {
        // Every stage except the last has exactly its successor.
        for window in TrackingStage::ALL.windows(2) {
            let [from, to] = window else { unreachable!() };
            assert_eq!(from.next(), Some(*to));
            assert!(from.can_advance_to(*to));
        }
        assert_eq!(TrackingStage::Delivered.next(), None);
    }

    #[test]
    fn test_tracking_stage_rejects_skips_and_backward() {
        use TrackingStage::{Delivered, OutForDelivery, Processing, Shipped};

        // Skipping ahead
        assert!(!Processing.can_advance_to(Delivered));
        assert!(!Processing.can_advance_to(OutForDelivery));
        // Going backward
        assert!(!Shipped.can_advance_to(Processing));
        assert!(!Delivered.can_advance_to(OutForDelivery));
        // Standing still
        assert!(!Shipped.can_advance_to(Shipped));
    }

    #[test]
    fn test_tracking_stage_terminal() {
        assert!(TrackingStage::Delivered.is_terminal());
        assert!(!TrackingStage::OutForDelivery.is_terminal());
        for stage in TrackingStage::ALL {
            assert!(!TrackingStage::Delivered.can_advance_to(stage));
        }
    }

    #[test]
    fn test_tracking_stage_wire_labels() {
        let json = serde_json::to_string(&TrackingStage::ReachedFinalStation).unwrap();
        assert_eq!(json, "\"Reached at final station\"");

        let parsed: TrackingStage = serde_json::from_str("\"Out for delivery\"").unwrap();
        assert_eq!(parsed, TrackingStage::OutForDelivery);
    }

    #[test]
    fn test_db_representation_roundtrip() {
        for stage in TrackingStage::ALL {
            assert_eq!(TrackingStage::from_db_str(stage.as_db_str()).unwrap(), stage);
        }
        assert_eq!(OrderStatus::Cancelled.as_db_str(), "cancelled");
        assert_eq!(
            OrderStatus::from_db_str("confirmed").unwrap(),
            OrderStatus::Confirmed
        );
        assert!(OrderStatus::from_db_str("refunded").is_err());
        assert_eq!(
            WorkshopCategory::OneOnOne.as_db_str(),
            "one_on_one"
        );
        assert_eq!(
            OtpPurpose::from_db_str("cancel_order").unwrap(),
            OtpPurpose::CancelOrder
        );
    }

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        assert_eq!(
            serde_json::to_string(&OrderKind::Custom).unwrap(),
            "\"CUSTOM\""
        );
    }

    #[test]
    fn test_user_role_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("customer".parse::<UserRole>().unwrap(), UserRole::Customer);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_otp_purpose_default_is_place_order() {
        assert_eq!(OtpPurpose::default(), OtpPurpose::PlaceOrder);
    }
}
