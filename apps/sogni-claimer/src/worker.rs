use crate::api::{format_remaining, ClaimOutcome, Eligibility, RewardApi};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{AccountToken, Worker, WorkerStats, CLAIM_RESULT_TARGET};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// What one check/claim pass observed.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub eligibility: Eligibility,
    pub claim: Option<ClaimOutcome>,
}

impl CycleReport {
    pub fn claimed(&self) -> bool {
        self.claim.as_ref().is_some_and(ClaimOutcome::is_success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.eligibility, Eligibility::Failed { .. })
            || self.claim.as_ref().is_some_and(|c| !c.is_success())
    }
}

/// Check → claim → sleep loop for a single account.
pub struct AccountWorker<A> {
    token: AccountToken,
    api: A,
    interval: Duration,
    run_once: bool,
}

impl<A: RewardApi> AccountWorker<A> {
    pub fn new(token: AccountToken, api: A, interval: Duration) -> Self {
        Self {
            token,
            api,
            interval,
            run_once: false,
        }
    }

    pub fn run_once(mut self, run_once: bool) -> Self {
        self.run_once = run_once;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// One CHECKING → (CLAIMING) pass. A failed claim is not retried here;
    /// the next attempt happens on the next scheduled cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        info!("🔐 Checking account {}", self.token);

        let eligibility = self.api.check(&self.token).await;
        match &eligibility {
            Eligibility::Claimable => info!("Daily boost is claimable."),
            Eligibility::CoolingDown { remaining } => {
                info!("Next claim in {}", format_remaining(*remaining))
            }
            Eligibility::NotAvailable => info!("No claim available yet."),
            Eligibility::Failed { reason } => error!("Error checking reward: {}", reason),
        }

        if !eligibility.is_claimable() {
            return CycleReport {
                eligibility,
                claim: None,
            };
        }

        let outcome = self.api.claim(&self.token).await;
        match &outcome {
            ClaimOutcome::Claimed => {
                info!(target: CLAIM_RESULT_TARGET, "Daily boost claimed SUCCESS for {}", self.token)
            }
            ClaimOutcome::Rejected { message } => {
                warn!(target: CLAIM_RESULT_TARGET, "Claim FAILED for {}: {}", self.token, message)
            }
            ClaimOutcome::Failed {
                reason,
                status,
                body,
            } => {
                error!(target: CLAIM_RESULT_TARGET, "Error claiming boost for {}: {}", self.token, reason);
                if let (Some(status), Some(body)) = (status, body) {
                    error!("Status: {}, Data: {}", status, body);
                }
            }
        }

        CycleReport {
            eligibility,
            claim: Some(outcome),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl<A> Worker for AccountWorker<A>
where
    A: RewardApi + 'static,
{
    fn label(&self) -> String {
        self.token.preview()
    }

    async fn start(&self, cancellation_token: CancellationToken) -> Result<WorkerStats> {
        let mut stats = WorkerStats::default();

        loop {
            if cancellation_token.is_cancelled() {
                info!("Worker stopping (cancelled).");
                break;
            }

            match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
                Ok(report) => {
                    if report.claimed() {
                        stats.claims += 1;
                    }
                    if report.is_failure() {
                        stats.failed += 1;
                    }
                }
                Err(payload) => {
                    stats.failed += 1;
                    error!("Error in process: {}", panic_message(&*payload));
                }
            }
            stats.cycles += 1;

            if self.run_once {
                break;
            }

            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    info!("Worker stopping (cancelled).");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        Ok(stats)
    }
}
