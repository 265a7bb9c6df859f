//! Response types serialized by the route handlers.

mod error_response;
mod user;

pub use error_response::ErrorResponse;
pub use user::{SigninResponse, UserResponse};
