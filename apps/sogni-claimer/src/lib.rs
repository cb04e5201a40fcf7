//! Sogni daily boost claimer.
//!
//! Polls the rewards endpoint for every account in `token.txt`, claims the
//! daily boost when the server flags it claimable, and repeats on a fixed
//! interval. Each account runs in its own task with its own HTTP client,
//! optionally tunnelled through a proxy from `proxy.txt`.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod worker;

pub use api::{ClaimOutcome, Eligibility, RewardApi, RewardClient};
pub use config::{ApiConfig, ClaimerConfig};
pub use worker::{AccountWorker, CycleReport};
