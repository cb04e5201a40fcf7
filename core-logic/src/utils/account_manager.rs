use crate::error::ConfigError;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bearer credential for one remote account.
///
/// Wiped from memory on drop. `Debug` and `Display` only ever show a short
/// preview, so the token can be passed to log macros safely.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AccountToken(String);

impl AccountToken {
    const PREVIEW_LEN: usize = 5;

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw value for the `authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(Self::PREVIEW_LEN).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for AccountToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountToken").field(&self.preview()).finish()
    }
}

impl fmt::Display for AccountToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

pub struct AccountManager;

impl AccountManager {
    pub const DEFAULT_FILE: &'static str = "token.txt";

    /// Loads one token per line, trimmed, skipping blank lines. An empty
    /// result is a configuration error.
    pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<AccountToken>, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path_str.clone(),
            },
            _ => ConfigError::IoError {
                path: path_str.clone(),
                msg: e.to_string(),
            },
        })?;

        let accounts = Self::parse_accounts(&content);
        if accounts.is_empty() {
            return Err(ConfigError::NoAccounts { path: path_str });
        }

        info!("Loaded {} accounts from {}", accounts.len(), path_str);
        Ok(accounts)
    }

    pub fn parse_accounts(content: &str) -> Vec<AccountToken> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(AccountToken::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let accounts = AccountManager::parse_accounts("  tokenA \n\n\ttokenB\r\n   \n");

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].expose(), "tokenA");
        assert_eq!(accounts[1].expose(), "tokenB");
    }

    #[test]
    fn test_parse_keeps_every_non_blank_line() {
        let accounts = AccountManager::parse_accounts("#hashPrefixed
tokenB
");

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].expose(), "#hashPrefixed");
    }

    #[test]
    fn test_debug_never_prints_full_token() {
        let token = AccountToken::new("eyJhbGciOiJIUzI1NiJ9.secret");

        assert_eq!(format!("{}", token), "eyJhb...");
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
