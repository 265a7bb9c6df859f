//! Typed request extractors.
//!
//! Everything a handler needs from a request arrives through one of these:
//! validated JSON bodies, the authenticated user, or the raw headers. Each
//! extractor rejects with the crate's own [`Error`] type so failures render
//! through the standard error response body.
//!
//! [`Error`]: crate::handler::Error

mod auth;
mod raw_headers;
mod reject;

pub use auth::{AuthClaims, AuthHeader, CurrentUser, authorize_roles};
pub use raw_headers::RawHeaders;
pub use reject::{Json, ValidateJson};
