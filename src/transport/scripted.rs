use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::errors::TransportError;

/// Replays canned responses in order and records every request it receives.
///
/// Used by the test suites to drive the clients without a network.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn respond_json(self, status: u16, body: serde_json::Value) -> Self {
        self.respond(status, body.to_string())
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    /// Queues the same status `times` times.
    pub fn repeat(self, times: usize, status: u16, body: &str) -> Self {
        (0..times).fold(self, |t, _| t.respond(status, body))
    }

    fn push(&self, response: Result<HttpResponse, TransportError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|log| log.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default()
    }

    /// Gaps between consecutive requests, on tokio's clock.
    pub fn intervals(&self) -> Vec<std::time::Duration> {
        self.requests
            .lock()
            .map(|log| log.windows(2).map(|w| w[1].0 - w[0].0).collect())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push((Instant::now(), request));
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted response left".to_string())))
    }
}
