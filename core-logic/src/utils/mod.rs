//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod account_manager;
pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod retry;
pub(crate) mod runner;
pub(crate) mod transport;

pub use account_manager::{AccountManager, AccountToken};
pub use logger::{setup_logger, CLAIM_RESULT_TARGET};
pub use proxy_manager::ProxyManager;
pub use runner::{supervise, WorkerRunner};
