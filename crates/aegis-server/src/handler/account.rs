//! Account handlers for the authenticated user.
//!
//! These routes sit behind `require_authentication`, so extraction is a
//! cache hit and never touches the database a second time.

use axum::Router;
use axum::routing::get;

use crate::extract::{CurrentUser, Json, RawHeaders};
use crate::handler::response::UserResponse;
use crate::service::ServiceState;

/// Returns the acting user's profile.
async fn get_account(current_user: CurrentUser) -> Json<UserResponse> {
    Json(current_user.into_inner().into())
}

/// Diagnostic echo of the request headers exactly as received.
async fn get_account_headers(headers: RawHeaders) -> Json<Vec<(String, String)>> {
    Json(headers.into_inner())
}

/// Returns a [`Router`] with all account routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/account", get(get_account))
        .route("/account/headers", get(get_account_headers))
}
