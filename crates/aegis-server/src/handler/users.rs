//! Administrative user management handlers.
//!
//! These routes sit behind `require_admin`. Deactivation takes effect on the
//! target's very next request because token validation always consults the
//! live user record.

use aegis_postgres::PgClient;
use aegis_postgres::query::UserRepository;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::post;
use uuid::Uuid;

use crate::extract::Json;
use crate::handler::response::UserResponse;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for user administration operations.
const TRACING_TARGET: &str = "aegis_server::handler::users";

/// The 404 for administration of an unknown user id.
fn user_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("User not found")
        .with_resource("user")
}

/// Deactivates a user account.
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
async fn deactivate_user(
    State(pg_client): State<PgClient>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let existing = conn
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    if !existing.is_active() {
        tracing::debug!(
            target: TRACING_TARGET,
            user_id = %existing.id,
            "user is already deactivated"
        );
    }

    let user = conn
        .deactivate_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "user deactivated"
    );

    Ok(Json(user.into()))
}

/// Reactivates a previously deactivated user account.
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
async fn reactivate_user(
    State(pg_client): State<PgClient>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let existing = conn
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    if existing.is_active() {
        tracing::debug!(
            target: TRACING_TARGET,
            user_id = %existing.id,
            "user is already active"
        );
    }

    let user = conn
        .reactivate_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "user reactivated"
    );

    Ok(Json(user.into()))
}

/// Returns a [`Router`] with all user administration routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/users/{user_id}/deactivate", post(deactivate_user))
        .route("/users/{user_id}/reactivate", post(reactivate_user))
}
