//! Role-based authorization policy.

use aegis_postgres::types::Role;

use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::{ErrorKind, Result};

/// Checks whether the held roles satisfy the required roles.
///
/// The policy is any-of: holding at least one of the required roles grants
/// access. An empty requirement always passes, so routes that only need
/// authentication can share the same code path.
///
/// # Errors
///
/// Returns `Forbidden` when none of the required roles are held.
pub fn authorize_roles(held: &[String], required: &[Role]) -> Result<()> {
    if required.is_empty() {
        return Ok(());
    }

    let granted = required
        .iter()
        .any(|role| held.iter().any(|held| held == role.as_ref()));

    if granted {
        Ok(())
    } else {
        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            held = ?held,
            required = ?required,
            "Authorization denied: required role not held"
        );
        Err(ErrorKind::Forbidden
            .with_message("You don't have permission to access this resource")
            .with_resource("authorization"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_requirement_always_passes() {
        assert!(authorize_roles(&[], &[]).is_ok());
        assert!(authorize_roles(&["user".to_owned()], &[]).is_ok());
    }

    #[test]
    fn held_role_grants_access() {
        let held = vec!["admin".to_owned(), "user".to_owned()];
        assert!(authorize_roles(&held, &[Role::Admin]).is_ok());
    }

    #[test]
    fn missing_role_is_forbidden() {
        let held = vec!["user".to_owned()];
        let error = authorize_roles(&held, &[Role::Admin]).unwrap_err();
        assert_eq!(error.kind(), crate::handler::ErrorKind::Forbidden);
    }

    #[test]
    fn no_roles_held_is_forbidden() {
        assert!(authorize_roles(&[], &[Role::Admin]).is_err());
    }

    #[test]
    fn any_of_required_roles_suffices() {
        let held = vec!["user".to_owned()];
        assert!(authorize_roles(&held, &[Role::Admin, Role::User]).is_ok());
    }
}
