use anyhow::Result;
use clap::Parser;
use core_logic::{setup_logger, supervise, WorkerRunner};
use dotenv::dotenv;
use sogni_claimer::bootstrap;
use sogni_claimer::ClaimerConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Token file, one bearer token per line
    #[arg(long)]
    tokens: Option<String>,
    /// Proxy file, one proxy per line
    #[arg(long)]
    proxies: Option<String>,
    #[arg(long)]
    interval_minutes: Option<u64>,
    /// Run a single check/claim cycle per account and exit
    #[arg(long)]
    once: bool,
}

impl Args {
    fn apply(self, config: &mut ClaimerConfig) {
        if let Some(tokens) = self.tokens {
            config.token_file = tokens;
        }
        if let Some(proxies) = self.proxies {
            config.proxy_file = proxies;
        }
        if let Some(minutes) = self.interval_minutes {
            config.check_interval_minutes = minutes;
        }
        if self.once {
            config.run_once = true;
        }
    }
}

fn print_banner() {
    info!("==================================================");
    info!("      Auto Claim Daily Bot Sogni Ai    ");
    info!("==================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    let mut config = ClaimerConfig::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    let _log_guard = setup_logger(&config.log_dir, config.console_level()?)?;

    print_banner();
    info!("Starting Daily Boost Claim Bot...");
    info!("Checking every {} minutes.", config.check_interval_minutes);

    let config = Arc::new(config);
    let shutdown = WorkerRunner::shutdown_token();

    supervise(config.restart_delay(), shutdown.clone(), || {
        let config = config.clone();
        let shutdown = shutdown.clone();
        async move { bootstrap::run(&config, shutdown).await }
    })
    .await
}
