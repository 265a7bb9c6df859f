#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use aegis_server::handler;
use aegis_server::service::ServiceState;
use anyhow::Context;
use axum::Router;

use crate::config::Cli;

/// Tracing target for server startup events.
pub const TRACING_TARGET_SERVER_STARTUP: &str = "aegis_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "aegis_cli::server::shutdown";

/// Tracing target for configuration events.
pub const TRACING_TARGET_CONFIG: &str = "aegis_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service)?;
    run_migrations(&state).await?;

    let router = create_router(state);
    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
fn create_service_state(
    config: &aegis_server::service::ServiceConfig,
) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config).context("failed to create service state")
}

/// Applies pending database migrations before the server accepts traffic.
async fn run_migrations(state: &ServiceState) -> anyhow::Result<()> {
    let applied = state
        .postgres
        .run_pending_migrations()
        .await
        .context("failed to run database migrations")?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        migrations_applied = applied.len(),
        "database schema is up to date"
    );

    Ok(())
}

/// Creates the router with application state attached.
fn create_router(state: ServiceState) -> Router {
    handler::routes(state.clone()).with_state(state)
}
