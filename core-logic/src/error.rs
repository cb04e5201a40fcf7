//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! Callers usually carry these inside `anyhow::Error` and recover them
//! with `downcast_ref`.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("No accounts found in {path}")]
    NoAccounts { path: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },
}

/// Network and HTTP-related errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("HTTP error {status_code} from {endpoint}")]
    HttpError {
        status_code: u16,
        endpoint: String,
        body: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl NetworkError {
    /// Maps a reqwest transport error onto the typed variants.
    pub fn from_reqwest(endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            NetworkError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetworkError::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            NetworkError::HttpError { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Proxy specification errors. Never fatal: the transport falls back to a
/// direct connection when one of these is raised.
#[derive(Error, Debug, Clone)]
pub enum ProxyError {
    #[error("Invalid proxy '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },

    #[error("Failed to build client for proxy '{spec}': {reason}")]
    ClientBuild { spec: String, reason: String },
}
