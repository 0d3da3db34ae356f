//! Integration tests for logging and tracing

use datawrapper_export::client::{with_retry, ApiError, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[test]
fn test_env_filter_parsing() {
    for directive in [
        "info",
        "datawrapper_export=info",
        "warn,datawrapper_export=debug",
        "datawrapper_export::client=trace",
    ] {
        assert!(
            EnvFilter::try_new(directive).is_ok(),
            "filter '{directive}' should parse"
        );
    }
}

#[test]
fn test_json_subscriber_initialization() {
    // Fails only when another test already installed a global subscriber
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("datawrapper_export=debug"))
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_retry_logging_under_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("datawrapper_export=debug"))
        .with_test_writer()
        .try_init();

    let counter = AtomicU32::new(0);
    let calls = &counter;
    let policy = RetryPolicy::new(2, Duration::ZERO);

    let result: Result<(), ApiError> = with_retry(&policy, "/charts/abc12", move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::http(503, "Service Unavailable"))
    })
    .await;

    assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}
