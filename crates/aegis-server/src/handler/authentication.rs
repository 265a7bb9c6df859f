//! Authentication handlers for user signup and signin.
//!
//! Signin is deliberately uniform: unknown email, wrong password, and
//! deactivated account all answer with the same 401 and message, and the
//! unknown-email path burns a dummy verification so response timing does not
//! reveal which accounts exist.

use aegis_postgres::PgClient;
use aegis_postgres::model::{NewUser, User};
use aegis_postgres::query::UserRepository;
use aegis_postgres::types::Role;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use serde::Deserialize;
use validator::Validate;

use crate::extract::{AuthClaims, Json, ValidateJson};
use crate::handler::response::{SigninResponse, UserResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AuthKeys, PasswordHasher, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "aegis_server::handler::authentication";

/// Request payload for signup.
#[must_use]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    /// Email address of the new account.
    #[validate(email)]
    pub email: String,
    /// Plaintext password, hashed before it ever reaches storage.
    #[validate(length(min = 8))]
    pub password: String,
    /// Display name.
    #[validate(length(min = 2, max = 64))]
    pub full_name: String,
}

/// Request payload for signin.
#[must_use]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SigninRequest {
    /// Email address of the account.
    #[validate(email)]
    pub email: String,
    /// Password of the account.
    pub password: String,
}

/// The one 401 every signin failure collapses into.
fn invalid_credentials() -> Error<'static> {
    ErrorKind::Unauthorized
        .with_message("Invalid credentials")
        .with_resource("authentication")
}

/// Applies the signin policy to a lookup result.
///
/// Unknown email, wrong password, and deactivated account are
/// indistinguishable to the caller, and the unknown-email branch burns a
/// dummy verification so timing does not differ either.
fn authenticate_user(
    password_hasher: &PasswordHasher,
    user: Option<User>,
    password: &str,
) -> Result<User> {
    let Some(user) = user else {
        password_hasher.verify_dummy_password(password);
        return Err(invalid_credentials());
    };

    if password_hasher
        .verify_password(password, &user.password_hash)
        .is_err()
    {
        return Err(invalid_credentials());
    }

    if !user.is_active() {
        tracing::warn!(
            target: TRACING_TARGET,
            user_id = %user.id,
            "signin rejected: account is deactivated"
        );
        return Err(invalid_credentials());
    }

    Ok(user)
}

/// Registers a new user account.
#[tracing::instrument(skip_all)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email,
        "signup attempt"
    );

    let password_hash = password_hasher.hash_password(&request.password)?;

    let new_user = NewUser {
        email: request.email,
        password_hash,
        full_name: request.full_name,
        roles: vec![Role::User.to_string()],
    };

    let mut conn = pg_client.get_connection().await?;

    if conn.email_exists(&new_user.email).await? {
        tracing::warn!(
            target: TRACING_TARGET,
            email = %new_user.email,
            "signup failed: email already exists"
        );
        return Err(ErrorKind::BadRequest
            .with_message("A user with this email address already exists")
            .with_resource("user"));
    }

    // A concurrent duplicate signup that slips past the check loses on the
    // unique constraint and surfaces as the same 400 through the constraint
    // mapping.
    let user = conn.create_user(new_user).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "user registered"
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Authenticates a user and issues a signed bearer token.
#[tracing::instrument(skip_all)]
async fn signin(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(auth_keys): State<AuthKeys>,
    ValidateJson(request): ValidateJson<SigninRequest>,
) -> Result<Json<SigninResponse>> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email,
        "signin attempt"
    );

    let mut conn = pg_client.get_connection().await?;
    let user = conn.find_user_by_email(&request.email).await?;
    let user = authenticate_user(&password_hasher, user, &request.password)?;

    let auth_claims = AuthClaims::for_user(&user, &auth_keys)?;
    let token = auth_claims.encode(&auth_keys)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        expires_at = %auth_claims.expires_at,
        "user signed in"
    );

    Ok(Json(SigninResponse {
        token,
        expires_at: auth_claims.expires_at,
        user: user.into(),
    }))
}

/// Returns a [`Router`] with all public authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::handler::test::create_test_server;

    fn stored_user(hasher: &PasswordHasher, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_owned(),
            password_hash: hasher.hash_password(password).unwrap(),
            full_name: "Test User".to_owned(),
            roles: vec!["user".to_owned()],
            is_active: true,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            updated_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn signin_failures_collapse_into_one_message() {
        let hasher = PasswordHasher::new();
        let user = stored_user(&hasher, "correct-horse-battery");

        let unknown = authenticate_user(&hasher, None, "correct-horse-battery").unwrap_err();
        let wrong_password =
            authenticate_user(&hasher, Some(user.clone()), "wrong-password").unwrap_err();

        let mut deactivated = user;
        deactivated.is_active = false;
        let inactive =
            authenticate_user(&hasher, Some(deactivated), "correct-horse-battery").unwrap_err();

        for error in [unknown, wrong_password, inactive] {
            assert_eq!(error.kind(), ErrorKind::Unauthorized);
            assert_eq!(error.message(), Some("Invalid credentials"));
        }
    }

    #[test]
    fn signin_accepts_active_user_with_correct_password() {
        let hasher = PasswordHasher::new();
        let user = stored_user(&hasher, "correct-horse-battery");

        let authenticated =
            authenticate_user(&hasher, Some(user.clone()), "correct-horse-battery").unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/signup")
            .json(&json!({
                "email": "not-an-email",
                "password": "long-enough-password",
                "fullName": "Test User",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_short_password() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/signup")
            .json(&json!({
                "email": "user@example.com",
                "password": "short",
                "fullName": "Test User",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_malformed_body() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/signup")
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signin_rejects_invalid_email_format() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/signin")
            .json(&json!({
                "email": "not-an-email",
                "password": "whatever-password",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
