//! Authentication extractors: bearer token claims and the resolved user.

mod auth_header;
mod current_user;
mod permission;

pub use auth_header::{AuthClaims, AuthHeader};
pub use current_user::CurrentUser;
pub use permission::authorize_roles;
