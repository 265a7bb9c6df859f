//! Database query repositories for the credential store.
//!
//! Repositories provide high-level, type-safe database operations over the
//! pooled async connection. The credential store contract is intentionally
//! small: create, lookup, and administrative activation toggles.

mod user;

pub use user::UserRepository;
