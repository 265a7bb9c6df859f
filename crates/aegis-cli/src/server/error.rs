//! Server error types.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error type for server startup and runtime failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Runtime server error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Determines if this error is potentially recoverable.
    ///
    /// Recoverable errors are those that might succeed if retried or if the
    /// environment changes (e.g., different port, wait for resource).
    pub fn is_recoverable(&self) -> bool {
        let kind = match self {
            Self::Bind { source, .. } => source.kind(),
            Self::Runtime(err) => err.kind(),
        };

        matches!(
            kind,
            io::ErrorKind::PermissionDenied
                | io::ErrorKind::AddrInUse
                | io::ErrorKind::AddrNotAvailable
                | io::ErrorKind::Interrupted
                | io::ErrorKind::TimedOut
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_in_use_is_recoverable() {
        let error = ServerError::Bind {
            address: "127.0.0.1:3000".to_owned(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };

        assert!(error.is_recoverable());
    }

    #[test]
    fn unexpected_runtime_error_is_not_recoverable() {
        let error = ServerError::Runtime(io::Error::other("broken"));

        assert!(!error.is_recoverable());
    }
}
