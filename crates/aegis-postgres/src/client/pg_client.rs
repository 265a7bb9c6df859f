use std::fmt;
use std::sync::Arc;

use deadpool::managed::Pool;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{
    ConnectionPool, MIGRATIONS, PgConfig, PgError, PgResult, PooledConnection,
    TRACING_TARGET_CONNECTION, TRACING_TARGET_MIGRATION,
};

/// High-level database client that manages connections and migrations.
///
/// This struct provides the main interface for credential store operations,
/// encapsulating connection pool management, configuration, and migration
/// handling. Connections are established lazily on first use.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

/// Inner data for [`PgClient`].
struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// This establishes a connection pool; no connections are opened until
    /// [`get_connection`](Self::get_connection) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool configuration is invalid.
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            database_url = %config.database_url_masked(),
            max_connections = config.postgres_max_connections,
            "initializing database client"
        );

        let manager = AsyncDieselConnectionManager::new(&config.postgres_url);

        let mut builder = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .runtime(deadpool::Runtime::Tokio1);
        if let Some(timeout) = config.connection_timeout() {
            builder = builder.wait_timeout(Some(timeout)).create_timeout(Some(timeout));
        }

        let pool = builder.build().map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "failed to create connection pool"
            );
            PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
        })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Acquires a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is exhausted, closed, or the backend
    /// cannot be reached.
    pub async fn get_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(|e| {
            let error = PgError::from(e);
            if error.is_transient() {
                tracing::warn!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %error,
                    "failed to acquire database connection, retry may succeed"
                );
            } else {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %error,
                    "failed to acquire database connection"
                );
            }
            error
        })
    }

    /// Returns the configuration used to create this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }

    /// Runs all pending embedded migrations.
    ///
    /// Intended to be called once at startup, before the server accepts
    /// requests. Diesel's migration harness is synchronous, so the work is
    /// moved onto a blocking task.
    pub async fn run_pending_migrations(&self) -> PgResult<Vec<String>> {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            "starting database migration process"
        );

        let conn = self.get_connection().await?;
        let mut conn: AsyncConnectionWrapper<_> = conn.into();

        let versions = spawn_blocking(move || {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.iter().map(ToString::to_string).collect::<Vec<_>>())
        })
        .await
        .map_err(|join_error| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %join_error,
                "migration task panicked"
            );
            PgError::Migration(join_error.into())
        })?
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %e,
                "database migration process failed"
            );
            PgError::Migration(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            migrations_count = versions.len(),
            "database migration process completed"
        );

        Ok(versions)
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
