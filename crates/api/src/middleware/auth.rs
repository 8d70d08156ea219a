//! Authentication extractors.
//!
//! Authorization lives here, in one place, rather than as per-route role
//! sniffing: handlers declare `RequireUser` or `RequireAdmin` in their
//! signature and never look at client-asserted identity.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires an authenticated session.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Rejection returned when no authenticated session is present.
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "authentication required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from_parts(parts).await.ok_or(Unauthenticated)?;
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user_from_parts(parts).await))
    }
}

/// Extractor that requires an admin session.
///
/// Missing session and wrong role are distinct failures so a logged-in
/// customer sees a uniform `Forbidden` rather than a login prompt.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for the admin guard.
pub enum AdminRejection {
    /// Nobody is logged in.
    Unauthenticated,
    /// Logged in, but not an admin.
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => Unauthenticated.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "msg": "admin access required" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from_parts(parts)
            .await
            .ok_or(AdminRejection::Unauthenticated)?;

        if !user.is_admin() {
            return Err(AdminRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

/// Read the current user out of the session attached to the request.
async fn current_user_from_parts(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Helper to set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
