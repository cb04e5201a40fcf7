use core_logic::{with_retry, NetworkError, RetryConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_retry_success_first_try() {
    let counter = Arc::new(AtomicUsize::new(0));
    let config = RetryConfig::new(3, 10);

    let result: Result<String, anyhow::Error> = with_retry(config, "test_op", || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("success".to_string())
        }
    })
    .await;

    assert!(result.is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_success_after_failures() {
    let counter = Arc::new(AtomicUsize::new(0));
    let config = RetryConfig::new(3, 10);

    let result: Result<String, anyhow::Error> = with_retry(config, "test_op", || {
        let counter = counter.clone();
        async move {
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if count < 3 {
                Err(anyhow::anyhow!("temporary error"))
            } else {
                Ok("success".to_string())
            }
        }
    })
    .await;

    assert!(result.is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_call_is_attempted_four_times() {
    let counter = Arc::new(AtomicUsize::new(0));
    let stamps = Arc::new(std::sync::Mutex::new(Vec::new()));
    let start = tokio::time::Instant::now();

    let result: Result<(), anyhow::Error> = with_retry(RetryConfig::default(), "test_op", || {
        let counter = counter.clone();
        let stamps = stamps.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            stamps.lock().unwrap().push(start.elapsed());
            Err(anyhow::anyhow!("permanent error"))
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 4);

    let stamps = stamps.lock().unwrap().clone();
    let gaps: Vec<Duration> = stamps.windows(2).map(|w| w[1] - w[0]).collect();
    let expected = [1000u64, 2000, 4000];
    assert_eq!(gaps.len(), expected.len());
    for (gap, millis) in gaps.iter().zip(expected) {
        let expected = Duration::from_millis(millis);
        assert!(
            *gap >= expected && *gap < expected + Duration::from_millis(10),
            "gap {:?} should be about {:?}",
            gap,
            expected
        );
    }
}

#[tokio::test]
async fn test_each_call_starts_with_a_fresh_counter() {
    let config = RetryConfig::new(3, 1);

    for _ in 0..2 {
        let counter = Arc::new(AtomicUsize::new(0));
        let _: Result<(), anyhow::Error> = with_retry(config, "test_op", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(anyhow::anyhow!("boom"))
            }
        })
        .await;
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }
}

#[tokio::test]
async fn test_final_error_keeps_typed_source() {
    let config = RetryConfig::new(1, 1);

    let result: Result<(), anyhow::Error> = with_retry(config, "GET rewards", || async {
        Err(NetworkError::HttpError {
            status_code: 502,
            endpoint: "https://api.example.com/rewards".to_string(),
            body: "bad gateway".to_string(),
        }
        .into())
    })
    .await;

    let err = result.unwrap_err();
    assert!(format!("{}", err).contains("GET rewards failed after 2 attempts"));

    let network = err.downcast_ref::<NetworkError>().expect("typed error");
    assert_eq!(network.status_code(), Some(502));
    assert_eq!(network.body(), Some("bad gateway"));
}
