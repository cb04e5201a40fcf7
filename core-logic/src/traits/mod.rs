use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    /// Completed check cycles, including ones that ended in an error
    pub cycles: u64,
    pub claims: u64,
    pub failed: u64,
}

/// A long-running per-account job driven by [`crate::WorkerRunner`].
#[async_trait]
pub trait Worker: Send + Sync {
    /// Short label used in log spans (never the raw credential)
    fn label(&self) -> String;

    /// Run until the token is cancelled
    async fn start(&self, cancellation_token: CancellationToken) -> Result<WorkerStats>;
}
