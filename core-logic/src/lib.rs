//! # Core Logic - Shared Utilities for Account Automation
//!
//! This crate provides the target-independent machinery used by the claimer
//! apps: credential and proxy loading, per-account HTTP transports, retry
//! with exponential backoff, the worker runner and the logger.
//!
//! ## Modules
//!
//! - [`config`] - Proxy and transport configuration types
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions
//! - [`utils`] - Utility modules (accounts, proxies, transport, retry, runner)

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{ProxyConfig, TransportConfig};
pub use error::{ConfigError, NetworkError, ProxyError};
pub use traits::{Worker, WorkerStats};

pub use utils::{
    setup_logger, supervise, AccountManager, AccountToken, ProxyManager, WorkerRunner,
    CLAIM_RESULT_TARGET,
};

pub use utils::retry::{with_retry, RetryConfig};
pub use utils::transport::{
    build_client, classify_proxy, redact_proxy_url, HttpClient, ProxyRoute, ProxyScheme,
};
