use crate::config::ProxyConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub struct ProxyManager;

impl ProxyManager {
    pub const DEFAULT_FILE: &'static str = "proxy.txt";

    /// Loads proxies from `path`. A missing or unreadable file means
    /// "no proxies" and is only logged.
    pub fn load_proxies(path: impl AsRef<Path>) -> Vec<ProxyConfig> {
        let path = path.as_ref();
        match Self::read_proxies(path) {
            Ok(proxies) => {
                info!("Loaded {} proxies from {}", proxies.len(), path.display());
                proxies
            }
            Err(e) => {
                warn!("No proxies found or error loading proxies: {:#}", e);
                Vec::new()
            }
        }
    }

    fn read_proxies(path: &Path) -> Result<Vec<ProxyConfig>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(Self::parse_proxies(&content))
    }

    /// One proxy per line; blank lines and `#` comments are skipped.
    pub fn parse_proxies(content: &str) -> Vec<ProxyConfig> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> ProxyConfig {
        // ip:port:user:pass exports carry credentials outside the URL
        if !line.contains("://") {
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() == 4 {
                return ProxyConfig {
                    url: format!("{}:{}", parts[0], parts[1]),
                    username: Some(parts[2].to_string()),
                    password: Some(parts[3].to_string()),
                };
            }
        }

        ProxyConfig::new(line)
    }

    /// Round-robin assignment: account `index` gets `proxies[index % len]`.
    pub fn assign(proxies: &[ProxyConfig], index: usize) -> Option<&ProxyConfig> {
        if proxies.is_empty() {
            None
        } else {
            proxies.get(index % proxies.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let proxies = ProxyManager::parse_proxies(
            "socks5://1.1.1.1:1080\n\n  # backup pool\n  http://2.2.2.2:8080  \n",
        );

        assert_eq!(
            proxies,
            vec![
                ProxyConfig::new("socks5://1.1.1.1:1080"),
                ProxyConfig::new("http://2.2.2.2:8080"),
            ]
        );
    }

    #[test]
    fn test_parse_vendor_credential_format() {
        let proxies = ProxyManager::parse_proxies("3.3.3.3:8000:alice:hunter2");

        assert_eq!(proxies[0].url, "3.3.3.3:8000");
        assert_eq!(proxies[0].username.as_deref(), Some("alice"));
        assert_eq!(proxies[0].password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_assign_round_robin() {
        let proxies = vec![ProxyConfig::new("a:1"), ProxyConfig::new("b:2")];

        assert_eq!(ProxyManager::assign(&proxies, 0).unwrap().url, "a:1");
        assert_eq!(ProxyManager::assign(&proxies, 1).unwrap().url, "b:2");
        assert_eq!(ProxyManager::assign(&proxies, 2).unwrap().url, "a:1");
        assert!(ProxyManager::assign(&[], 5).is_none());
    }
}
