//! Shared database types: roles and constraint violations.

mod constraint;
mod role;

pub use constraint::{ConstraintViolation, UserConstraints};
pub use role::Role;
