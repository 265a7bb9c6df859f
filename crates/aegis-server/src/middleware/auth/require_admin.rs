use aegis_postgres::types::Role;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::extract::{CurrentUser, authorize_roles};

/// Requires the authenticated user to hold the admin role.
///
/// Authentication failures surface as the validator's 401 family; a valid
/// user without the admin role is rejected with `Forbidden` and the wrapped
/// handler never runs.
///
/// #### Notes
///
/// - See [`require_authentication`](super::require_authentication) for the
///   validation chain this builds on.
pub async fn require_admin(
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Response {
    if let Err(error) = authorize_roles(&user.roles, &[Role::Admin]) {
        return error.into_response();
    }

    next.run(request).await
}
