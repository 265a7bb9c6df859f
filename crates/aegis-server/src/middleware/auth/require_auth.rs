use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::CurrentUser;

/// Requires a valid authentication token to proceed with the request.
///
/// Extracting [`CurrentUser`] performs the whole validation chain: header
/// presence, signature and expiry, and the live database lookup. Any failure
/// short-circuits with that step's error and the wrapped handler never runs.
/// On success the resolved user is cached in request extensions, so handlers
/// behind this guard extract [`CurrentUser`] without a second database query.
///
/// #### Examples
///
/// ```rust,no_run
/// use aegis_server::middleware::require_authentication;
/// use aegis_server::service::{ServiceConfig, ServiceState};
/// use axum::middleware::from_fn_with_state;
/// use axum::routing::get;
/// use axum::Router;
///
/// # fn main() -> aegis_server::service::Result<()> {
/// let state = ServiceState::from_config(&ServiceConfig::default())?;
/// let guard = from_fn_with_state(state.clone(), require_authentication);
///
/// let router: Router = Router::new()
///     .route("/account", get(|| async { "profile" }))
///     .route_layer(guard)
///     .with_state(state);
/// # Ok(())
/// # }
/// ```
pub async fn require_authentication(
    CurrentUser(_): CurrentUser,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
