use crate::api::RewardClient;
use crate::config::ClaimerConfig;
use crate::worker::AccountWorker;
use anyhow::Result;
use core_logic::{build_client, redact_proxy_url, AccountManager, ProxyManager, WorkerRunner};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Loads accounts and proxies and builds one worker per account, each with
/// its own HTTP client. Fails only when no account can be loaded.
pub fn prepare(config: &ClaimerConfig) -> Result<Vec<AccountWorker<RewardClient>>> {
    let accounts = AccountManager::load_accounts(&config.token_file)?;
    let proxies = ProxyManager::load_proxies(&config.proxy_file);

    if proxies.is_empty() {
        info!("🌐 No proxies, running in direct mode");
    }

    let workers = accounts
        .into_iter()
        .enumerate()
        .map(|(i, token)| {
            let proxy = ProxyManager::assign(&proxies, i);
            if let Some(p) = proxy {
                info!(
                    "Assigned proxy {} to account {}",
                    redact_proxy_url(&p.url),
                    token
                );
            }

            let http = build_client(proxy, &config.transport);
            let client = RewardClient::new(http, config.api.clone(), config.retry);
            AccountWorker::new(token, client, config.check_interval()).run_once(config.run_once)
        })
        .collect();

    Ok(workers)
}

/// Builds the workers and runs them until they finish or `token` fires.
pub async fn run(config: &ClaimerConfig, token: CancellationToken) -> Result<()> {
    let workers = prepare(config)?;
    WorkerRunner::run_workers(workers, token).await
}
