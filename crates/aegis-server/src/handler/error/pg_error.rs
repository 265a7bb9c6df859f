//! Database error to HTTP error conversion handlers.
//!
//! Converts [`PgError`] values and named constraint violations into the
//! HTTP error taxonomy. Constraint violations on the `users` table become
//! client-facing `400`s with actionable messages; everything else is logged
//! and collapses into an opaque `500`.

use aegis_postgres::PgError;
use aegis_postgres::types::{ConstraintViolation, UserConstraints};

use crate::handler::{Error, ErrorKind};

/// Tracing target for database error conversions.
const TRACING_TARGET: &str = "aegis_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::User(c) => c.into(),
        }
    }
}

impl From<UserConstraints> for Error<'static> {
    fn from(constraint: UserConstraints) -> Self {
        let error = match constraint {
            UserConstraints::EmailUnique => ErrorKind::BadRequest
                .with_message("A user with this email address already exists"),
            UserConstraints::EmailNotEmpty => {
                ErrorKind::BadRequest.with_message("Email cannot be empty")
            }
            UserConstraints::PasswordHashNotEmpty => {
                ErrorKind::BadRequest.with_message("Password cannot be empty")
            }
            UserConstraints::FullNameLength => ErrorKind::BadRequest
                .with_message("Full name must be between 2 and 64 characters"),
        };

        error.with_resource("user")
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                // Try to extract constraint violation
                if let Some(constraint_name) = error.constraint()
                    && let Some(constraint) = ConstraintViolation::new(constraint_name)
                {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        constraint = constraint_name,
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                // Generic query error without constraint
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

// Used only for transactions.
impl From<aegis_postgres::error::DieselError> for Error<'static> {
    fn from(error: aegis_postgres::error::DieselError) -> Self {
        // Convert DieselError -> PgError -> Error
        let pg_error: PgError = error.into();
        pg_error.into()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn duplicate_email_maps_to_bad_request() {
        let violation = ConstraintViolation::new("users_email_unique").unwrap();
        let error = Error::from(violation);

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.message(),
            Some("A user with this email address already exists")
        );
        assert_eq!(error.resource(), Some("user"));
    }

    #[test]
    fn unrecognized_query_error_maps_to_internal() {
        let pg_error = PgError::from(aegis_postgres::error::DieselError::NotFound);
        let error = Error::from(pg_error);

        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
