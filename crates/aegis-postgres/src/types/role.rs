//! Role tags attached to users.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Coarse-grained permission tag attached to a user.
///
/// Roles are stored as a `text[]` column; unknown tags in the database are
/// ignored by role checks rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrative privileges across the entire system.
    Admin,
    /// Regular authenticated user.
    User,
}
