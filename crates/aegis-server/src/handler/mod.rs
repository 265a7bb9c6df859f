//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use aegis_server::handler;
//! use aegis_server::service::{ServiceConfig, ServiceState};
//! use axum::Router;
//!
//! # fn main() -> aegis_server::service::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config)?;
//!
//! let router: Router = handler::routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod account;
mod authentication;
mod error;
pub mod response;
mod users;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::{require_admin, require_authentication};
use crate::service::ServiceState;

#[inline]
async fn fallback_handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes.
///
/// Public authentication routes are mounted as-is; account routes sit behind
/// the authentication guard and user administration behind the admin guard.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state.clone(), require_authentication);
    let require_admin = from_fn_with_state(state, require_admin);

    let public_router = authentication::routes();
    let account_router = account::routes().route_layer(require_authentication);
    let admin_router = users::routes().route_layer(require_admin);

    Router::new()
        .merge(public_router)
        .merge(account_router)
        .merge(admin_router)
        .fallback(fallback_handler)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use aegis_postgres::model::User;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Extension, Router};
    use axum_test::TestServer;
    use uuid::Uuid;

    use super::*;
    use crate::extract::CurrentUser;
    use crate::service::{ServiceConfig, ServiceState};

    /// Returns a state backed by the lazy default config; no database needed.
    pub fn test_state() -> ServiceState {
        let config = ServiceConfig::default();
        ServiceState::from_config(&config).expect("default config must produce a state")
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        let state = test_state();
        let app = routes(state.clone()).with_state(state);
        Ok(TestServer::new(app)?)
    }

    fn user_with_roles(roles: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            full_name: "Test User".to_owned(),
            roles: roles.iter().map(ToString::to_string).collect(),
            is_active: true,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            updated_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[tokio::test]
    async fn missing_authorization_header_is_401() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/account").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "missing_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_401() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .get("/account")
            .authorization_bearer("definitely-not-a-jwt")
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_404() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/definitely/not/a/route").await;
        response.assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn account_profile_has_no_password_hash() -> anyhow::Result<()> {
        let state = test_state();
        // A pre-resolved user in extensions is a cache hit for the guard, so
        // the route works without a database.
        let app = routes(state.clone())
            .layer(Extension(CurrentUser(user_with_roles(&["user"]))))
            .with_state(state);
        let server = TestServer::new(app)?;

        let response = server.get("/account").await;
        response.assert_status(StatusCode::OK);

        let body: serde_json::Value = response.json();
        assert_eq!(body["email"], "user@example.com");
        assert_eq!(body["fullName"], "Test User");
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password_hash").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn header_echo_preserves_duplicates() -> anyhow::Result<()> {
        let state = test_state();
        let app = routes(state.clone())
            .layer(Extension(CurrentUser(user_with_roles(&["user"]))))
            .with_state(state);
        let server = TestServer::new(app)?;

        let response = server
            .get("/account/headers")
            .add_header("x-dup", "one")
            .add_header("x-dup", "two")
            .await;
        response.assert_status(StatusCode::OK);

        let pairs: Vec<(String, String)> = response.json();
        let dups: Vec<&str> = pairs
            .iter()
            .filter(|(name, _)| name == "x-dup")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(dups, ["one", "two"]);
        Ok(())
    }

    /// Router with one admin-guarded route that counts handler invocations.
    fn guarded_counting_router(
        state: ServiceState,
        current_user: CurrentUser,
        calls: Arc<AtomicUsize>,
    ) -> Router {
        let require_admin = from_fn_with_state(state.clone(), require_admin);

        Router::new()
            .route(
                "/guarded",
                post(move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        StatusCode::OK
                    }
                }),
            )
            .route_layer(require_admin)
            .layer(Extension(current_user))
            .with_state(state)
    }

    #[tokio::test]
    async fn admin_guard_blocks_non_admin_without_running_handler() -> anyhow::Result<()> {
        let state = test_state();
        let calls = Arc::new(AtomicUsize::new(0));
        let current_user = CurrentUser(user_with_roles(&["user"]));

        let app = guarded_counting_router(state, current_user, calls.clone());
        let server = TestServer::new(app)?;

        let response = server.post("/guarded").await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn admin_guard_admits_admin() -> anyhow::Result<()> {
        let state = test_state();
        let calls = Arc::new(AtomicUsize::new(0));
        let current_user = CurrentUser(user_with_roles(&["user", "admin"]));

        let app = guarded_counting_router(state, current_user, calls.clone());
        let server = TestServer::new(app)?;

        let response = server.post("/guarded").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }
}
