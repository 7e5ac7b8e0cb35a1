//! Canned transports for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued replies in order and records every request it receives.
pub(crate) struct StubTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub(crate) fn with_replies(replies: Vec<Result<HttpResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("stub transport ran out of replies")
    }
}

/// Never answers within any reasonable timeout.
pub(crate) struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(ApiError::transport("stalled transport woke up"))
    }
}

pub(crate) fn reply(status: u16, body: &str) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    })
}

/// A 200 reply wrapping `data` in a well-formed envelope.
pub(crate) fn envelope(data: serde_json::Value) -> Result<HttpResponse, ApiError> {
    let body = serde_json::json!({
        "data": data,
        "message": "ok",
        "success": true,
        "timestamp": "2024-01-01T00:00:00Z",
    });
    reply(200, &body.to_string())
}

pub(crate) fn refused() -> Result<HttpResponse, ApiError> {
    Err(ApiError::transport("connection failed: connection refused"))
}
