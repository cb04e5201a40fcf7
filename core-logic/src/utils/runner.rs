use crate::traits::Worker;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

pub struct WorkerRunner;

impl WorkerRunner {
    /// Returns a token that is cancelled on Ctrl+C.
    pub fn shutdown_token() -> CancellationToken {
        let token = CancellationToken::new();
        let cloned_token = token.clone();

        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("🛑 Received Ctrl+C. Initiating graceful shutdown...");
                    cloned_token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });

        token
    }

    /// Spawns every worker as an independent task and waits for all of them.
    ///
    /// A worker that fails or panics is logged and does not affect the rest.
    pub async fn run_workers<W>(workers: Vec<W>, token: CancellationToken) -> Result<()>
    where
        W: Worker + 'static,
    {
        let mut set = JoinSet::new();

        let start_time = std::time::Instant::now();
        info!("Starting {} account workers...", workers.len());

        for (i, worker) in workers.into_iter().enumerate() {
            let id = i + 1;
            let span = tracing::info_span!(
                "account",
                account_id = %format!("{:03}", id),
                token = %worker.label()
            );
            let child_token = token.clone();

            set.spawn(
                async move {
                    match worker.start(child_token).await {
                        Ok(stats) => Ok(stats),
                        Err(e) => {
                            error!("Worker {} failed: {:?}", id, e);
                            Err(e)
                        }
                    }
                }
                .instrument(span),
            );
        }

        let mut total_cycles = 0;
        let mut total_claims = 0;
        let mut total_failed = 0;

        while let Some(res) = set.join_next().await {
            match res {
                Ok(Ok(stats)) => {
                    total_cycles += stats.cycles;
                    total_claims += stats.claims;
                    total_failed += stats.failed;
                }
                Ok(Err(_)) => {
                    // Already logged in the task
                }
                Err(e) => {
                    error!("A worker task panicked or failed to join: {:?}", e);
                }
            }
        }

        info!("🛑 Shutdown Complete.");
        info!(
            "Total Time: {:.1}s | Cycles: {} | Claims: {} | Failed: {}",
            start_time.elapsed().as_secs_f64(),
            total_cycles,
            total_claims,
            total_failed
        );

        Ok(())
    }
}

/// Re-runs `bootstrap` after `restart_delay` whenever it returns an error.
///
/// Returns once `bootstrap` succeeds or `token` is cancelled.
pub async fn supervise<F, Fut>(
    restart_delay: Duration,
    token: CancellationToken,
    mut bootstrap: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    loop {
        if token.is_cancelled() {
            return Ok(());
        }

        match bootstrap().await {
            Ok(()) => return Ok(()),
            Err(e) => {
                error!("❌ Critical error: {:#}", e);
                info!("Restarting in {}s...", restart_delay.as_secs());
            }
        }

        tokio::select! {
            _ = token.cancelled() => return Ok(()),
            _ = tokio::time::sleep(restart_delay) => {}
        }
    }
}
