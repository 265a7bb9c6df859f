#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

// Tracing target constants for consistent logging.

/// Tracing target for authentication operations.
pub const TRACING_TARGET_AUTHENTICATION: &str = "aegis_server::authentication";

/// Tracing target for authorization operations.
pub const TRACING_TARGET_AUTHORIZATION: &str = "aegis_server::authorization";
