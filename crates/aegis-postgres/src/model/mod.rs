//! Database models for the credential store.

mod user;

pub use user::{NewUser, UpdateUser, User};
