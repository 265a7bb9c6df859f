//! Security primitives: password hashing and token signing keys.

mod auth_keys;
mod password_hasher;

pub use auth_keys::AuthKeys;
pub use password_hasher::PasswordHasher;
