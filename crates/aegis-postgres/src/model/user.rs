//! User model for the credential store.
//!
//! ## Models
//!
//! - [`User`] - Main user model with identity, credentials, roles and state
//! - [`NewUser`] - Data structure for creating new users
//! - [`UpdateUser`] - Data structure for partial user updates

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;
use crate::types::Role;

/// Main user model representing an account in the system.
///
/// The `password_hash` field holds an Argon2id PHC string; it is never
/// serialized towards clients (response types simply have no such field).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier, generated at creation.
    pub id: Uuid,
    /// Primary email for authentication; unique, lowercase, token subject.
    pub email: String,
    /// Securely hashed password (Argon2id PHC string).
    pub password_hash: String,
    /// Human-readable name for UI and communications.
    pub full_name: String,
    /// Role tags attached to the user; may be empty.
    pub roles: Vec<String>,
    /// Whether the user may authenticate. Flipped only by administrative
    /// deactivate/reactivate operations.
    pub is_active: bool,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Primary email for authentication.
    pub email: String,
    /// Securely hashed password.
    pub password_hash: String,
    /// Human-readable name for UI and communications.
    pub full_name: String,
    /// Role tags attached to the user.
    pub roles: Vec<String>,
}

/// Data for updating a user.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    /// Human-readable name.
    pub full_name: Option<String>,
    /// Securely hashed password.
    pub password_hash: Option<String>,
    /// Role tags.
    pub roles: Option<Vec<String>>,
    /// Account activation state.
    pub is_active: Option<bool>,
}

impl User {
    /// Returns whether the user is active and can authenticate.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns whether the user carries the given role tag.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.as_ref())
    }

    /// Returns whether the user has administrator privileges.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
