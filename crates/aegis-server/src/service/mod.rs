//! Application state and dependency injection.

mod config;
mod error;
mod security;

use aegis_postgres::PgClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::error::{Result, ServiceError};
pub use crate::service::security::{AuthKeys, PasswordHasher};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub auth_keys: AuthKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Creates the lazy database client and derives the signing keys. An
    /// unusable secret fails here, before the server ever binds a socket.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            postgres: config.connect_postgres()?,

            password_hasher: PasswordHasher::new(),
            auth_keys: config.load_auth_keys()?,
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(auth_keys: AuthKeys);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_default_config_without_database() {
        let config = ServiceConfig::default();
        let state = ServiceState::from_config(&config).unwrap();

        // The pool is lazy: constructing state must not require a server.
        let _: PgClient = axum::extract::FromRef::from_ref(&state);
    }
}
