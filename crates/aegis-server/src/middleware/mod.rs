//! Middleware for `axum::Router` and HTTP request processing.

mod auth;

pub use auth::{require_admin, require_authentication};
