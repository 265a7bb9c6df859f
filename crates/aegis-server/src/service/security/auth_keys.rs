//! Token signing key management.
//!
//! The whole process shares one HMAC secret: every issued token is signed
//! with it and every incoming token is verified against it. The secret is
//! checked once at startup so encoding never fails per-request afterwards.

use std::fmt;
use std::sync::Arc;

use jiff::Span;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::service::{Result, ServiceError};

/// Minimum accepted secret length in bytes.
///
/// HS256 secrets shorter than the hash output size weaken the MAC, so
/// anything under 32 bytes is rejected at startup.
const MIN_SECRET_BYTES: usize = 32;

/// Accepted token lifetime range in hours.
const LIFETIME_HOURS_RANGE: std::ops::RangeInclusive<i64> = 2..=24;

/// Keys used for signing and verifying bearer tokens.
///
/// Thread-safe and cheap to clone; all request handlers share the same
/// underlying key material.
#[derive(Clone)]
pub struct AuthKeys {
    inner: Arc<AuthKeysInner>,
}

/// Internal container for the actual key data.
struct AuthKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime_hours: i64,
}

impl AuthKeys {
    /// Derives signing keys from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidSigningKey`] if the secret is shorter
    /// than 32 bytes, and [`ServiceError::Config`] if the lifetime falls
    /// outside the accepted 2 to 24 hour range.
    pub fn from_secret(secret: &[u8], token_lifetime_hours: i64) -> Result<Self> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ServiceError::invalid_signing_key(format!(
                "Token secret must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            )));
        }

        if !LIFETIME_HOURS_RANGE.contains(&token_lifetime_hours) {
            return Err(ServiceError::config(format!(
                "Token lifetime must be between {} and {} hours, got {}",
                LIFETIME_HOURS_RANGE.start(),
                LIFETIME_HOURS_RANGE.end(),
                token_lifetime_hours
            )));
        }

        let inner = Arc::new(AuthKeysInner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime_hours,
        });

        Ok(Self { inner })
    }

    /// Returns a reference to the encoding key.
    ///
    /// This key is used to sign JWT tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns a reference to the decoding key.
    ///
    /// This key is used to verify JWT tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the configured lifetime of issued tokens.
    #[inline]
    pub fn token_lifetime(&self) -> Span {
        Span::new().hours(self.inner.token_lifetime_hours)
    }
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material is never printed.
        f.debug_struct("AuthKeys")
            .field("token_lifetime_hours", &self.inner.token_lifetime_hours)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test-secret-key-with-enough-bytes-0123456789";

    #[test]
    fn accepts_valid_secret_and_lifetime() {
        let keys = AuthKeys::from_secret(TEST_SECRET, 12).unwrap();
        assert_eq!(keys.token_lifetime().get_hours(), 12);
    }

    #[test]
    fn rejects_short_secret() {
        let error = AuthKeys::from_secret(b"too-short", 12).unwrap_err();
        assert_eq!(error.category(), "signing_key");
    }

    #[test]
    fn rejects_lifetime_outside_range() {
        assert!(AuthKeys::from_secret(TEST_SECRET, 1).is_err());
        assert!(AuthKeys::from_secret(TEST_SECRET, 25).is_err());
        assert!(AuthKeys::from_secret(TEST_SECRET, 2).is_ok());
        assert!(AuthKeys::from_secret(TEST_SECRET, 24).is_ok());
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let keys = AuthKeys::from_secret(TEST_SECRET, 12).unwrap();
        let debug = format!("{:?}", keys);

        assert!(!debug.contains("test-secret"));
        assert!(debug.contains("token_lifetime_hours"));
    }
}
