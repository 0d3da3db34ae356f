use datawrapper_export::client::config::DEFAULT_BASE_URL;
use datawrapper_export::client::{ApiConfig, DatawrapperClient, RetryPolicy};
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = ApiConfig::from_values(Some("secret".to_string()), None).unwrap();
    assert_eq!(config.retry, RetryPolicy::default());
    assert_eq!(
        config.endpoint("/charts/abc12"),
        format!("{DEFAULT_BASE_URL}/charts/abc12")
    );
}

#[test]
fn test_overrides_flow_into_client() {
    let config = ApiConfig::from_values(Some("secret".to_string()), None)
        .unwrap()
        .with_base_url("http://localhost:8080/v3/")
        .unwrap()
        .with_retry(RetryPolicy::new(3, Duration::from_millis(250)))
        .unwrap();
    assert_eq!(config.endpoint("/folders/1"), "http://localhost:8080/v3/folders/1");

    let client = DatawrapperClient::new(config).unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080/v3/");
    assert_eq!(client.retry_policy().max_retries, 3);
    assert_eq!(client.retry_policy().base_wait, Duration::from_millis(250));
}
