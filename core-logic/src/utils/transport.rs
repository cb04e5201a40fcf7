//! # Transport Factory
//!
//! Builds one `reqwest` client per account. A proxy, when present, is
//! classified by its scheme prefix and wired in as a tunnel; a proxy that
//! reqwest rejects degrades to a direct connection with a warning.

use crate::config::{ProxyConfig, TransportConfig};
use crate::error::ProxyError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE};
use reqwest::{redirect, Client, ClientBuilder, Proxy, Url};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScheme {
    Socks4,
    Socks5,
    Http,
    Https,
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProxyScheme::Socks4 => "SOCKS4",
            ProxyScheme::Socks5 => "SOCKS5",
            ProxyScheme::Http => "HTTP",
            ProxyScheme::Https => "HTTPS",
        };
        f.write_str(name)
    }
}

/// How a client reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyRoute {
    Direct,
    Proxied { scheme: ProxyScheme, url: String },
}

impl ProxyRoute {
    pub fn is_direct(&self) -> bool {
        matches!(self, ProxyRoute::Direct)
    }
}

/// An account's HTTP client together with the route it was built for.
#[derive(Debug)]
pub struct HttpClient {
    inner: Client,
    route: ProxyRoute,
}

impl HttpClient {
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn route(&self) -> &ProxyRoute {
        &self.route
    }
}

/// Classifies a proxy spec by its (case-insensitive) scheme prefix.
///
/// Bare `host:port` values are treated as plain HTTP proxies.
pub fn classify_proxy(spec: &str) -> (ProxyScheme, String) {
    let spec = spec.trim();
    let lower = spec.to_ascii_lowercase();

    if lower.starts_with("socks4://") {
        (ProxyScheme::Socks4, spec.to_string())
    } else if lower.starts_with("socks5://") {
        (ProxyScheme::Socks5, spec.to_string())
    } else if lower.starts_with("https://") {
        (ProxyScheme::Https, spec.to_string())
    } else if lower.starts_with("http://") {
        (ProxyScheme::Http, spec.to_string())
    } else {
        (ProxyScheme::Http, format!("http://{}", spec))
    }
}

/// Proxy URL with any password stripped, for log output.
pub fn redact_proxy_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

fn base_builder(config: &TransportConfig) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    // Accept-Encoding comes from reqwest's gzip/brotli/deflate features.
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(redirect::Policy::limited(config.max_redirects))
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
}

fn build_direct(config: &TransportConfig) -> HttpClient {
    let inner = base_builder(config)
        .build()
        .unwrap_or_else(|_| Client::new());

    HttpClient {
        inner,
        route: ProxyRoute::Direct,
    }
}

fn try_build_proxied(
    proxy: &ProxyConfig,
    config: &TransportConfig,
) -> Result<HttpClient, ProxyError> {
    let (scheme, url) = classify_proxy(&proxy.url);

    let mut tunnel = Proxy::all(url.as_str()).map_err(|e| ProxyError::InvalidSpec {
        spec: redact_proxy_url(&proxy.url),
        reason: e.to_string(),
    })?;
    if let (Some(u), Some(p)) = (&proxy.username, &proxy.password) {
        tunnel = tunnel.basic_auth(u, p);
    }

    let inner = base_builder(config)
        .proxy(tunnel)
        .build()
        .map_err(|e| ProxyError::ClientBuild {
            spec: redact_proxy_url(&proxy.url),
            reason: e.to_string(),
        })?;

    Ok(HttpClient {
        inner,
        route: ProxyRoute::Proxied { scheme, url },
    })
}

/// Builds the client for one account. Performs no network I/O.
pub fn build_client(proxy: Option<&ProxyConfig>, config: &TransportConfig) -> HttpClient {
    let Some(proxy) = proxy else {
        info!("No proxy provided, using direct connection.");
        return build_direct(config);
    };

    match try_build_proxied(proxy, config) {
        Ok(client) => {
            if let ProxyRoute::Proxied { scheme, url } = client.route() {
                info!(
                    "Successfully created {} proxy client for {}",
                    scheme,
                    redact_proxy_url(url)
                );
            }
            client
        }
        Err(e) => {
            warn!("{}. Using direct connection.", e);
            build_direct(config)
        }
    }
}
