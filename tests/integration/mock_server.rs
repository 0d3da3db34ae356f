//! In-process mock of the Datawrapper API
//!
//! Serves folders, charts, embed codes and exports from fixed JSON, records
//! every request, and can answer a path with a number of 500s before
//! succeeding.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use datawrapper_export::client::{ApiConfig, DatawrapperClient, RetryPolicy};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "test-token";

/// A request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

/// Canned responses
#[derive(Debug, Default)]
pub struct MockApi {
    folders: HashMap<u64, Value>,
    charts: HashMap<String, Value>,
    embeds: HashMap<String, Value>,
    exports: HashMap<String, Vec<u8>>,
    failures: Mutex<HashMap<String, u32>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(mut self, id: u64, body: Value) -> Self {
        self.folders.insert(id, body);
        self
    }

    pub fn chart(mut self, id: &str, body: Value) -> Self {
        self.charts.insert(id.to_string(), body);
        self
    }

    pub fn embed(mut self, id: &str, body: Value) -> Self {
        self.embeds.insert(id.to_string(), body);
        self
    }

    /// Override the export body of a chart (all formats)
    pub fn export_body(mut self, id: &str, body: &[u8]) -> Self {
        self.exports.insert(id.to_string(), body.to_vec());
        self
    }

    /// Answer `path` with `count` 500 responses before serving it normally
    pub fn fail_first(self, path: &str, count: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(path.to_string(), count);
        }
        self
    }

    fn record(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn take_failure(&self, path: &str) -> bool {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(path) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn respond(&self, method: &Method, path: &str) -> Response {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["folders", id]) => {
                let body = id.parse::<u64>().ok().and_then(|id| self.folders.get(&id));
                json_or_404(body)
            }
            ("GET", ["charts", id]) => json_or_404(self.charts.get(*id)),
            ("GET", ["charts", id, "embed-codes"]) => json_or_404(self.embeds.get(*id)),
            ("POST", ["charts", _id, "publish"]) => {
                (StatusCode::OK, axum::Json(serde_json::json!({}))).into_response()
            }
            ("GET", ["charts", id, "export", format]) => {
                if !self.charts.contains_key(*id) {
                    return (StatusCode::NOT_FOUND, "chart not found").into_response();
                }
                let body = self
                    .exports
                    .get(*id)
                    .cloned()
                    .unwrap_or_else(|| format!("{format}:{id}").into_bytes());
                (StatusCode::OK, Bytes::from(body)).into_response()
            }
            _ => (StatusCode::NOT_FOUND, "no such route").into_response(),
        }
    }
}

fn json_or_404(body: Option<&Value>) -> Response {
    match body {
        Some(Value::String(raw)) => (StatusCode::OK, raw.clone()).into_response(),
        Some(body) => (StatusCode::OK, axum::Json(body.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, "").into_response(),
    }
}

fn parse_query(uri: &Uri) -> HashMap<String, String> {
    uri.query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

async fn handle(
    State(api): State<Arc<MockApi>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().to_string();
    api.record(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: parse_query(&uri),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if api.take_failure(&path) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "try again").into_response();
    }
    api.respond(&method, &path)
}

/// Running mock server, shut down on drop
pub struct MockServer {
    pub addr: SocketAddr,
    api: Arc<MockApi>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub async fn start(api: MockApi) -> Self {
        let api = Arc::new(api);
        let router = Router::new().fallback(handle).with_state(api.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            addr,
            api,
            handle: task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client against this server with no backoff wait
    pub fn client(&self, max_retries: u32) -> DatawrapperClient {
        let config = ApiConfig::from_values(Some(TEST_TOKEN.to_string()), Some(self.base_url()))
            .unwrap()
            .with_retry(RetryPolicy::new(max_retries, Duration::ZERO))
            .unwrap()
            .with_timeouts(Duration::from_secs(5), Duration::from_secs(2));
        DatawrapperClient::new(config).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.api.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
