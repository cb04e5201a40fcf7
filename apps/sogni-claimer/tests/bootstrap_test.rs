use core_logic::{ProxyRoute, ProxyScheme, Worker};
use sogni_claimer::bootstrap;
use sogni_claimer::ClaimerConfig;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn config_for(token_file: &str, proxy_file: &str) -> ClaimerConfig {
    ClaimerConfig {
        token_file: token_file.to_string(),
        proxy_file: proxy_file.to_string(),
        ..ClaimerConfig::default()
    }
}

#[test]
fn test_accounts_share_single_proxy() {
    let tokens = write_file("tokenAAAAA\ntokenBBBBB\n");
    let proxies = write_file("socks5://10.0.0.1:1080\n");
    let config = config_for(
        tokens.path().to_str().unwrap(),
        proxies.path().to_str().unwrap(),
    );

    let workers = bootstrap::prepare(&config).unwrap();

    assert_eq!(workers.len(), 2);
    let expected = ProxyRoute::Proxied {
        scheme: ProxyScheme::Socks5,
        url: "socks5://10.0.0.1:1080".to_string(),
    };
    for worker in &workers {
        assert_eq!(worker.api().route(), &expected);
    }
    assert_eq!(workers[0].label(), "token...");
}

#[test]
fn test_proxies_assigned_round_robin() {
    let tokens = write_file("token-1\ntoken-2\ntoken-3\n");
    let proxies = write_file("http://10.0.0.1:8080\n10.0.0.2:3128\n");
    let config = config_for(
        tokens.path().to_str().unwrap(),
        proxies.path().to_str().unwrap(),
    );

    let workers = bootstrap::prepare(&config).unwrap();

    let urls: Vec<String> = workers
        .iter()
        .map(|w| match w.api().route() {
            ProxyRoute::Proxied { url, .. } => url.clone(),
            ProxyRoute::Direct => "direct".to_string(),
        })
        .collect();
    assert_eq!(
        urls,
        vec![
            "http://10.0.0.1:8080",
            "http://10.0.0.2:3128",
            "http://10.0.0.1:8080",
        ]
    );
}

#[test]
fn test_missing_proxy_file_runs_direct() {
    let tokens = write_file("token-1\ntoken-2\ntoken-3\n");
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("proxy.txt");
    let config = config_for(tokens.path().to_str().unwrap(), missing.to_str().unwrap());

    let workers = bootstrap::prepare(&config).unwrap();

    assert_eq!(workers.len(), 3);
    assert!(workers.iter().all(|w| w.api().route().is_direct()));
}

#[test]
fn test_malformed_proxy_falls_back_to_direct() {
    let tokens = write_file("token-1\n");
    let proxies = write_file("http://127.0.0.1:notaport\n");
    let config = config_for(
        tokens.path().to_str().unwrap(),
        proxies.path().to_str().unwrap(),
    );

    let workers = bootstrap::prepare(&config).unwrap();

    assert_eq!(workers.len(), 1);
    assert!(workers[0].api().route().is_direct());
}

#[test]
fn test_empty_token_file_is_fatal() {
    let tokens = write_file("\n   \n");
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("proxy.txt");
    let config = config_for(tokens.path().to_str().unwrap(), missing.to_str().unwrap());

    let err = bootstrap::prepare(&config).err().unwrap();

    assert!(
        err.to_string().contains("No accounts"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_missing_token_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let tokens = dir.path().join("token.txt");
    let proxies = dir.path().join("proxy.txt");
    let config = config_for(tokens.to_str().unwrap(), proxies.to_str().unwrap());

    assert!(bootstrap::prepare(&config).is_err());
}
