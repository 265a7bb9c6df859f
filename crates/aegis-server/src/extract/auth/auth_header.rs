//! JWT authentication header extraction.
//!
//! This module provides bearer token handling for HTTP Authorization headers:
//! claims construction and signing on signin, and extraction plus validation
//! on every protected request.
//!
//! # Features
//!
//! - **JWT Validation**: Signature verification plus issuer, audience, and
//!   expiry checks
//! - **Header Extraction**: Automatic extraction from Authorization Bearer
//!   headers
//! - **Caching**: Request-scoped caching to avoid repeated parsing

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use jiff::Timestamp;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AuthKeys;

/// JWT claims for authentication tokens.
///
/// Contains the RFC 7519 registered claims this service relies on. The
/// subject is the account email so the validator can resolve the live user
/// record without a separate identifier claim.
///
/// | Claim | Field | Description |
/// |-------|-------|-------------|
/// | `iss` | `issued_by` | Token issuer identifier |
/// | `aud` | `audience` | Token audience identifier |
/// | `sub` | `subject` | Email of the account this token represents |
/// | `iat` | `issued_at` | Token creation timestamp |
/// | `exp` | `expires_at` | Token expiration timestamp |
///
/// Timestamps serialize as Unix seconds so expiry is also enforced by the
/// JWT library itself during decoding.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: String,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: String,
    /// Subject: email of the associated account.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Issued at (as Unix seconds).
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time (as Unix seconds).
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AuthClaims {
    /// Default JWT audience identifier for authentication tokens.
    const JWT_AUDIENCE: &str = "aegis:server";
    /// Default JWT issuer identifier for authentication tokens.
    const JWT_ISSUER: &str = "aegis";

    /// Creates claims for the given user with the keys' configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the expiration timestamp would overflow.
    pub fn for_user(user: &aegis_postgres::model::User, auth_keys: &AuthKeys) -> Result<Self> {
        Self::for_subject(user.email.clone(), auth_keys)
    }

    /// Creates claims for the given subject with the keys' configured lifetime.
    pub fn for_subject(subject: impl Into<String>, auth_keys: &AuthKeys) -> Result<Self> {
        let issued_at = Timestamp::now();
        let expires_at = issued_at.checked_add(auth_keys.token_lifetime()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                "Failed to compute token expiration timestamp"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_resource("authentication")
        })?;

        Ok(Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            subject: subject.into(),
            issued_at,
            expires_at,
        })
    }

    /// Checks if the token has expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Encodes the claims into a signed JWT token.
    ///
    /// # Errors
    ///
    /// Returns an internal error if JWT signing fails.
    pub fn encode(&self, auth_keys: &AuthKeys) -> Result<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, self, auth_keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                subject = %self.subject,
                "Failed to encode JWT token"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_resource("authentication")
        })
    }

    /// Parses and validates a JWT token string.
    ///
    /// Validation covers the HS256 signature, expiration, issuer, audience,
    /// and the presence of every registered claim this service relies on.
    ///
    /// # Errors
    ///
    /// Returns authentication errors for invalid, expired, or foreign tokens.
    pub fn decode(auth_token: &str, decoding_key: &DecodingKey) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false; // Not Before claim not used
        validation.validate_aud = true;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "iat", "exp"]);

        let token_data = decode::<Self>(auth_token, decoding_key, &validation)?;
        let claims = token_data.claims;

        // Double-check expiration for security
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                subject = %claims.subject,
                expired_at = %claims.expires_at,
                "JWT token validation failed: token expired"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            subject = %claims.subject,
            expires_at = %claims.expires_at,
            "JWT token validation completed successfully"
        );

        Ok(claims)
    }
}

/// JWT authentication header extractor.
///
/// Extracts and validates the bearer token from the Authorization header of
/// an incoming request. Validation covers signature integrity, expiration,
/// and issuer/audience matching.
///
/// Note: this extractor only performs JWT validation. For full authentication
/// including database verification, use [`CurrentUser`] instead.
///
/// [`CurrentUser`]: crate::extract::CurrentUser
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
}

impl AuthHeader {
    /// Returns a reference to the validated JWT claims.
    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    /// Creates an `AuthHeader` from a parsed Authorization header.
    fn from_header(
        authorization_header: TypedHeader<Authorization<Bearer>>,
        auth_keys: &AuthKeys,
    ) -> Result<Self> {
        let auth_claims = AuthClaims::decode(authorization_header.token(), auth_keys.decoding_key())?;
        Ok(Self { auth_claims })
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached header if available to avoid re-parsing
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        // Extract Bearer token from Authorization header
        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let auth_keys = AuthKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let auth_header = Self::from_header(bearer_header, &auth_keys)?;
                // Cache for subsequent extractors in the same request
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_message("Authentication required")
                        .with_context("Missing Authorization header with Bearer token")
                        .with_resource("authentication"),
                    TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                        .with_message("Invalid token format")
                        .with_context("Authorization header must contain a valid Bearer token")
                        .with_resource("authentication"),
                    _ => ErrorKind::InternalServerError
                        .with_message("Authentication processing failed")
                        .with_context("Unexpected error during header extraction")
                        .with_resource("authentication"),
                };
                Err(error)
            }
        }
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidToken => ErrorKind::MalformedAuthToken
                .with_message("Token not valid")
                .with_context("The provided token format is unrecognized"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Token not valid")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Token not valid")
                .with_context("Token was signed with an incompatible algorithm"),
            JwtErrorKind::InvalidAudience => ErrorKind::Unauthorized
                .with_message("Token not valid")
                .with_context("Token was issued for a different application"),
            JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Token not valid")
                .with_context("Token was not issued by this authentication system"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Token not valid")
                .with_context(format!("Token is missing required field: {}", claim)),
            JwtErrorKind::Base64(_) => ErrorKind::MalformedAuthToken
                .with_message("Token not valid")
                .with_context("Token contains invalid base64 encoding"),
            JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_message("Token not valid")
                .with_context("Token payload contains malformed data"),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context("An unexpected error occurred during token validation"),
        }
    }
}
