use anyhow::Result;
use config::{Config, File};
use core_logic::{AccountManager, ConfigError, ProxyManager, RetryConfig, TransportConfig};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Remote reward API endpoints and the reward this claimer targets.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub rewards_url: String,
    pub claim_url: String,
    pub referer: String,
    pub daily_boost_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rewards_url: "https://api.sogni.ai/v2/account/rewards".to_string(),
            claim_url: "https://api.sogni.ai/v2/account/reward/claim".to_string(),
            referer: "https://app.sogni.ai/".to_string(),
            daily_boost_id: "2".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClaimerConfig {
    pub token_file: String,
    pub proxy_file: String,
    pub check_interval_minutes: u64,
    pub restart_delay_secs: u64,
    pub log_dir: String,
    pub log_level: String,
    /// Run one cycle per account and exit
    pub run_once: bool,
    pub api: ApiConfig,
    pub transport: TransportConfig,
    pub retry: RetryConfig,
}

impl Default for ClaimerConfig {
    fn default() -> Self {
        Self {
            token_file: AccountManager::DEFAULT_FILE.to_string(),
            proxy_file: ProxyManager::DEFAULT_FILE.to_string(),
            check_interval_minutes: 60,
            restart_delay_secs: 60,
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
            run_once: false,
            api: ApiConfig::default(),
            transport: TransportConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClaimerConfig {
    /// Loads `path` if it exists; every field falls back to its default.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;

        let config: Self = settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "check_interval_minutes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        self.console_level()?;
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_minutes * 60)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }

    pub fn console_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidValue {
            field: "log_level".to_string(),
            reason: format!("unknown level '{}'", self.log_level),
        })
    }
}
