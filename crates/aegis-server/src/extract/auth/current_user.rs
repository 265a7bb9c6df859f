//! Current user extractor with database verification.
//!
//! This module provides [`CurrentUser`], the extractor that turns a verified
//! bearer token into the live user record. Unlike bare JWT validation it
//! guarantees the account still exists and is active, so a deactivation is
//! honored on the very next request even while older tokens remain
//! cryptographically valid.
//!
//! The verified user is cached in request extensions, so the guard middleware
//! pays for the database lookup once and every downstream extraction within
//! the same request is free.

use aegis_postgres::query::UserRepository;
use aegis_postgres::{PgClient, PgConnection, model::User};
use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::Extensions;
use axum::http::request::Parts;
use derive_more::Deref;

use super::AuthHeader;
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::response::UserResponse;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AuthKeys;

/// The authenticated user resolved from a bearer token.
///
/// When extraction succeeds the token was cryptographically valid, the
/// subject email resolved to an existing account, and that account is
/// active. The inner [`User`] is the current database state, not a snapshot
/// baked into the token.
///
/// # Error Conditions
///
/// - [`ErrorKind::MissingAuthToken`] / [`ErrorKind::MalformedAuthToken`]:
///   absent or unparseable Authorization header
/// - [`ErrorKind::Unauthorized`]: invalid token, unknown subject, or
///   deactivated account
/// - [`ErrorKind::InternalServerError`]: database failures
#[derive(Debug, Clone, Deref)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Resolves verified claims to a live user record.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the subject no longer maps to a user or
    /// the account has been deactivated.
    pub async fn from_claims(
        claims: &super::AuthClaims,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let user = conn
            .find_user_by_email(&claims.subject)
            .await
            .map_err(Error::from)?;

        Self::resolve(&claims.subject, user)
    }

    /// Applies the account policy to a lookup result.
    ///
    /// A token stays cryptographically valid after its account is deleted or
    /// deactivated; this is the step that rejects it anyway.
    fn resolve(subject: &str, user: Option<User>) -> Result<Self> {
        let user = user.ok_or_else(|| {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                subject = %subject,
                "Authentication failed: token subject no longer exists"
            );
            ErrorKind::Unauthorized
                .with_message("Token not valid")
                .with_resource("authentication")
        })?;

        if !user.is_active() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %user.id,
                "Authentication failed: account is deactivated"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("User is inactive, talk with an admin")
                .with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            user_id = %user.id,
            "Authentication verification completed successfully"
        );

        Ok(Self(user))
    }

    /// Reads the already-verified user out of request extensions.
    ///
    /// Intended for call sites that hold a request but run outside the
    /// extractor machinery. The guard middleware must have run first.
    ///
    /// # Errors
    ///
    /// Returns `MissingAuthState` when no guard established the user, which
    /// indicates a route wired without `require_authentication`.
    pub fn from_extensions(extensions: &Extensions) -> Result<Self> {
        extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                "Authenticated context accessed without the authentication guard"
            );
            ErrorKind::MissingAuthState.into_error()
        })
    }

    /// Returns a single named attribute of the sanitized user as JSON.
    ///
    /// Keys follow the response representation (`camelCase`), so the
    /// password hash is not reachable through this accessor.
    pub fn attribute(&self, key: &str) -> Option<serde_json::Value> {
        let sanitized = serde_json::to_value(UserResponse::from(self.0.clone())).ok()?;
        sanitized.get(key).cloned()
    }

    /// Consumes the extractor and returns the inner user record.
    #[inline]
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Sync + Send + 'static,
    PgClient: FromRef<S>,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Check for cached user to avoid repeated database queries
        if let Some(current_user) = parts.extensions.get::<Self>() {
            return Ok(current_user.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let postgres = PgClient::from_ref(state);

        let mut conn = postgres.get_connection().await.map_err(|db_error| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %db_error,
                "Database connection failed during authentication verification"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication verification is temporarily unavailable")
                .with_context("Unable to connect to authentication database")
        })?;

        let current_user = Self::from_claims(auth_header.as_auth_claims(), &mut conn).await?;

        // Cache the verified user for subsequent extractors in the same request
        parts.extensions.insert(current_user.clone());
        Ok(current_user)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Sync + Send + 'static,
    PgClient: FromRef<S>,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(current_user) => Ok(Some(current_user)),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_owned(),
            password_hash: "$argon2id$...".to_owned(),
            full_name: "Sample User".to_owned(),
            roles: vec!["user".to_owned()],
            is_active: true,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            updated_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn from_extensions_without_guard_is_programming_error() {
        let extensions = Extensions::new();
        let error = CurrentUser::from_extensions(&extensions).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingAuthState);
    }

    #[test]
    fn from_extensions_returns_cached_user() {
        let mut extensions = Extensions::new();
        extensions.insert(CurrentUser(sample_user()));

        let current_user = CurrentUser::from_extensions(&extensions).unwrap();
        assert_eq!(current_user.email, "user@example.com");
    }

    #[test]
    fn active_user_resolves() {
        let user = sample_user();
        let resolved = CurrentUser::resolve(&user.email, Some(user.clone())).unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[test]
    fn deactivation_rejects_still_valid_tokens() {
        // The subject resolved while the account was active; after the flip
        // the same lookup result must be rejected on the next request.
        let mut user = sample_user();
        assert!(CurrentUser::resolve(&user.email, Some(user.clone())).is_ok());

        user.is_active = false;
        let error = CurrentUser::resolve(&user.email, Some(user.clone())).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            error.message(),
            Some("User is inactive, talk with an admin")
        );
    }

    #[test]
    fn deleted_subject_rejects_still_valid_tokens() {
        let error = CurrentUser::resolve("ghost@example.com", None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        assert_eq!(error.message(), Some("Token not valid"));
    }

    #[test]
    fn attribute_exposes_sanitized_fields_only() {
        let current_user = CurrentUser(sample_user());

        let full_name = current_user.attribute("fullName").unwrap();
        assert_eq!(full_name, serde_json::json!("Sample User"));

        assert!(current_user.attribute("passwordHash").is_none());
        assert!(current_user.attribute("password_hash").is_none());
    }
}
