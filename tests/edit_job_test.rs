//! Edit job lifecycle tests against a scripted HTTP transport.
//!
//! Tokio's paused clock makes the fixed-interval poll timing observable:
//! `sleep` auto-advances virtual time, so elapsed time equals exactly the
//! sum of the waits the client performed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Instant;

use flux_edit_bot::models::edit::OutputFormat;
use flux_edit_bot::services::bfl::{BflClient, EditError};
use flux_edit_bot::services::transport::{HttpTransport, TransportError};

const EDITED_IMAGE: &[u8] = b"edited image bytes";

fn pending() -> Value {
    json!({ "status": "Pending" })
}

fn ready(sample: &str) -> Value {
    json!({ "status": "Ready", "result": { "sample": sample } })
}

/// Transport double: a fixed submit response, a queue of scripted poll
/// responses (falling back to `Pending` when exhausted), and a fixed
/// result download. Counts every request it sees.
struct MockTransport {
    submit: Result<Value, String>,
    polls: Mutex<VecDeque<Result<Value, String>>>,
    fetch: Result<Vec<u8>, String>,
    submit_count: AtomicU32,
    poll_count: AtomicU32,
    fetch_count: AtomicU32,
    fetched_urls: Mutex<Vec<String>>,
}

impl MockTransport {
    fn new(polls: Vec<Result<Value, String>>) -> Arc<Self> {
        Arc::new(Self {
            submit: Ok(json!({ "id": "job-123", "polling_url": "https://api.test/poll/job-123" })),
            polls: Mutex::new(polls.into()),
            fetch: Ok(EDITED_IMAGE.to_vec()),
            submit_count: AtomicU32::new(0),
            poll_count: AtomicU32::new(0),
            fetch_count: AtomicU32::new(0),
            fetched_urls: Mutex::new(Vec::new()),
        })
    }

    fn with_submit(polls: Vec<Result<Value, String>>, submit: Result<Value, String>) -> Arc<Self> {
        let mut mock = Self::new(polls);
        Arc::get_mut(&mut mock).unwrap().submit = submit;
        mock
    }

    fn with_fetch(polls: Vec<Result<Value, String>>, fetch: Result<Vec<u8>, String>) -> Arc<Self> {
        let mut mock = Self::new(polls);
        Arc::get_mut(&mut mock).unwrap().fetch = fetch;
        mock
    }

    fn polls_issued(&self) -> u32 {
        self.poll_count.load(Ordering::SeqCst)
    }

    fn fetches_issued(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(
        &self,
        _url: &str,
        _api_key: &str,
        _body: &Value,
    ) -> Result<Value, TransportError> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        self.submit
            .clone()
            .map_err(TransportError::Connection)
    }

    async fn get_json(&self, _url: &str, _api_key: &str) -> Result<Value, TransportError> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        let scripted = self.polls.lock().unwrap().pop_front();
        match scripted {
            Some(response) => response.map_err(TransportError::Connection),
            None => Ok(pending()),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.fetched_urls.lock().unwrap().push(url.to_string());
        self.fetch.clone().map_err(TransportError::Connection)
    }
}

fn client(transport: Arc<MockTransport>, max_polls: u32) -> BflClient {
    BflClient::new(
        transport,
        "https://api.test/flux-kontext-pro".to_string(),
        "test-key".to_string(),
        OutputFormat::Jpeg,
        2,
        max_polls,
        Duration::from_secs(2),
    )
}

#[tokio::test(start_paused = true)]
async fn test_pending_then_ready_fetches_result() {
    let transport = MockTransport::new(vec![
        Ok(pending()),
        Ok(pending()),
        Ok(ready("https://cdn.test/sample.jpg")),
    ]);
    let editor = client(Arc::clone(&transport), 60);

    let start = Instant::now();
    let result = editor.edit(b"input", "make it red", "16:9").await.unwrap();

    assert_eq!(result, EDITED_IMAGE);
    assert_eq!(transport.polls_issued(), 3);
    assert_eq!(transport.fetches_issued(), 1);
    assert_eq!(
        transport.fetched_urls.lock().unwrap().as_slice(),
        ["https://cdn.test/sample.jpg"]
    );
    // One 2s interval before each of the 3 polls.
    assert_eq!(start.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_all_pending_exhausts_poll_budget() {
    let transport = MockTransport::new(vec![]);
    let editor = client(Arc::clone(&transport), 5);

    let start = Instant::now();
    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    assert!(matches!(err, EditError::JobTimedOut(5)));
    assert_eq!(transport.polls_issued(), 5);
    assert_eq!(transport.fetches_issued(), 0);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_is_terminal() {
    let transport = MockTransport::new(vec![
        Ok(pending()),
        Ok(json!({ "status": "Failed", "failure_reason": "nsfw" })),
    ]);
    let editor = client(Arc::clone(&transport), 60);

    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    match err {
        EditError::JobFailed(reason) => assert_eq!(reason, "nsfw"),
        other => panic!("expected JobFailed, got {other:?}"),
    }
    // No further polls after the terminal status.
    assert_eq!(transport.polls_issued(), 2);
    assert_eq!(transport.fetches_issued(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_status_without_reason_uses_default() {
    let transport = MockTransport::new(vec![Ok(json!({ "status": "Error" }))]);
    let editor = client(Arc::clone(&transport), 60);

    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    match err {
        EditError::JobFailed(reason) => assert_eq!(reason, "Unknown error"),
        other => panic!("expected JobFailed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_missing_polling_url_fails_submission() {
    let transport = MockTransport::with_submit(vec![], Ok(json!({ "id": "job-123" })));
    let editor = client(Arc::clone(&transport), 60);

    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    assert!(matches!(err, EditError::SubmissionFailed(_)));
    assert_eq!(transport.polls_issued(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_submit_transport_error_is_not_retried() {
    let transport =
        MockTransport::with_submit(vec![], Err("connection refused".to_string()));
    let editor = client(Arc::clone(&transport), 60);

    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    assert!(matches!(err, EditError::SubmissionFailed(_)));
    assert_eq!(transport.submit_count.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(transport.polls_issued(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_poll_error_does_not_abort_job() {
    let transport = MockTransport::new(vec![
        Ok(pending()),
        Err("connection reset".to_string()),
        Ok(ready("https://cdn.test/sample.jpg")),
    ]);
    let editor = client(Arc::clone(&transport), 60);

    let result = editor.edit(b"input", "prompt", "1:1").await.unwrap();

    assert_eq!(result, EDITED_IMAGE);
    // The failed attempt consumed one slot of the budget.
    assert_eq!(transport.polls_issued(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_status_keeps_polling() {
    let transport = MockTransport::new(vec![
        Ok(json!({ "status": "Queued" })),
        Ok(json!({ "status": "Moderating" })),
        Ok(ready("https://cdn.test/sample.jpg")),
    ]);
    let editor = client(Arc::clone(&transport), 60);

    let result = editor.edit(b"input", "prompt", "1:1").await.unwrap();

    assert_eq!(result, EDITED_IMAGE);
    assert_eq!(transport.polls_issued(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_ready_without_sample_url_fails() {
    let transport = MockTransport::new(vec![Ok(json!({ "status": "Ready", "result": {} }))]);
    let editor = client(Arc::clone(&transport), 60);

    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    assert!(matches!(err, EditError::ResultFetchFailed(_)));
    assert_eq!(transport.fetches_issued(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_result_fetch_failure_is_not_retried() {
    let transport = MockTransport::with_fetch(
        vec![Ok(ready("https://cdn.test/sample.jpg"))],
        Err("cdn unreachable".to_string()),
    );
    let editor = client(Arc::clone(&transport), 60);

    let err = editor.edit(b"input", "prompt", "1:1").await.unwrap_err();

    assert!(matches!(err, EditError::ResultFetchFailed(_)));
    assert_eq!(transport.fetches_issued(), 1);
}
