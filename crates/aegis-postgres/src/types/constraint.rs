//! Database constraint violations mapped from Postgres constraint names.
//!
//! The HTTP layer relies on these types to turn the loser of a concurrent
//! duplicate-email signup into a client-facing error instead of a 500.

use std::fmt;

/// Unified constraint violation enum for any database constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Constraints on the `users` table.
    User(UserConstraints),
}

/// Named constraints of the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserConstraints {
    /// `users_email_unique` - email must be unique across all users.
    EmailUnique,
    /// `users_email_not_empty` - email must be non-empty after trimming.
    EmailNotEmpty,
    /// `users_password_hash_not_empty` - stored hash must be non-empty.
    PasswordHashNotEmpty,
    /// `users_full_name_length` - full name must be 2-64 characters.
    FullNameLength,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from a constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    pub fn new(constraint: &str) -> Option<Self> {
        let user = match constraint {
            "users_email_unique" => UserConstraints::EmailUnique,
            "users_email_not_empty" => UserConstraints::EmailNotEmpty,
            "users_password_hash_not_empty" => UserConstraints::PasswordHashNotEmpty,
            "users_full_name_length" => UserConstraints::FullNameLength,
            _ => return None,
        };

        Some(Self::User(user))
    }

    /// Returns the database constraint name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::User(UserConstraints::EmailUnique) => "users_email_unique",
            Self::User(UserConstraints::EmailNotEmpty) => "users_email_not_empty",
            Self::User(UserConstraints::PasswordHashNotEmpty) => "users_password_hash_not_empty",
            Self::User(UserConstraints::FullNameLength) => "users_full_name_length",
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_constraint_names() {
        assert_eq!(
            ConstraintViolation::new("users_email_unique"),
            Some(ConstraintViolation::User(UserConstraints::EmailUnique))
        );
        assert_eq!(
            ConstraintViolation::new("users_full_name_length"),
            Some(ConstraintViolation::User(UserConstraints::FullNameLength))
        );
    }

    #[test]
    fn rejects_unknown_constraint_names() {
        assert_eq!(ConstraintViolation::new("users_pkey"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn name_round_trips() {
        let names = [
            "users_email_unique",
            "users_email_not_empty",
            "users_password_hash_not_empty",
            "users_full_name_length",
        ];

        for name in names {
            let violation = ConstraintViolation::new(name).unwrap();
            assert_eq!(violation.name(), name);
        }
    }
}
