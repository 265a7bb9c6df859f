//! Service layer error types.
//!
//! These errors represent startup-time failures: bad configuration, an
//! unusable signing secret, or an unreachable database. They are fatal and
//! never surface on the per-request path.

use thiserror::Error;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Service layer error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error (invalid config values, missing settings, etc.).
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The token signing secret is missing, too short, or otherwise unusable.
    #[error("Invalid signing key: {message}")]
    InvalidSigningKey {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database connection or migration error.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal service error.
    #[error("Internal service error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ServiceError {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new signing key error.
    pub fn invalid_signing_key(message: impl Into<String>) -> Self {
        Self::InvalidSigningKey {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause to this error.
    pub fn with_source(mut self, new_source: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            Self::Config { source, .. }
            | Self::InvalidSigningKey { source, .. }
            | Self::Database { source, .. }
            | Self::Internal { source, .. } => *source = Some(Box::new(new_source)),
        }
        self
    }

    /// Returns the error category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "configuration",
            Self::InvalidSigningKey { .. } => "signing_key",
            Self::Database { .. } => "database",
            Self::Internal { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn error_creation() {
        let error = ServiceError::config("Invalid configuration");
        assert_eq!(error.category(), "configuration");
        assert!(error.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = ServiceError::database("Cannot reach database").with_source(source);

        assert_eq!(error.category(), "database");
        assert!(error.source().is_some());
    }

    #[test]
    fn signing_key_error_category() {
        let error = ServiceError::invalid_signing_key("secret too short");
        assert_eq!(error.category(), "signing_key");
    }
}
