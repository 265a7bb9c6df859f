//! User repository for the credential store.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewUser, UpdateUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
///
/// Covers the credential store contract: creation (duplicate emails surface
/// as a constraint violation), lookups by email and id, and the
/// administrative activation toggles. There are no deletion semantics.
pub trait UserRepository {
    /// Creates a new user.
    ///
    /// The email is normalized to trimmed lowercase before insertion. A
    /// duplicate email violates the `users_email_unique` constraint; exactly
    /// one of two concurrent signups with the same email wins, the loser
    /// observes the constraint violation.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by email address.
    ///
    /// Comparison is case-insensitive via lowercase normalization. Used for
    /// signin and for resolving the token subject on every protected request.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Applies partial updates to an existing user.
    ///
    /// Only fields set to `Some(value)` are modified. Returns `None` if the
    /// user was not found.
    fn update_user(
        &mut self,
        user_id: Uuid,
        updates: UpdateUser,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Deactivates a user.
    ///
    /// A deactivated user fails all future authentications immediately, even
    /// with a previously issued, still-unexpired token.
    fn deactivate_user(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Reactivates a previously deactivated user.
    fn reactivate_user(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Checks if an email address is already registered.
    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        // Normalize fields: trim whitespace, lowercase the login key
        new_user.email = new_user.email.trim().to_lowercase();
        new_user.full_name = new_user.full_name.trim().to_owned();

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email.eq(email.trim().to_lowercase()))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: Uuid, mut updates: UpdateUser) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        if let Some(name) = updates.full_name.as_mut() {
            *name = name.trim().to_owned();
        }

        diesel::update(users::table.filter(dsl::id.eq(user_id)))
            .set(&updates)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn deactivate_user(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        self.update_user(
            user_id,
            UpdateUser {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    async fn reactivate_user(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        self.update_user(
            user_id,
            UpdateUser {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        use schema::users::{self, dsl};

        let count: i64 = users::table
            .filter(dsl::email.eq(email.trim().to_lowercase()))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count > 0)
    }
}
