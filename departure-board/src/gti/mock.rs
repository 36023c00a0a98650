//! Scripted transport for testing without API access.
//!
//! Responses are queued per endpoint and handed out in order. Every request
//! is recorded with its headers and exact body bytes so tests can check the
//! signature against what was actually sent.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::header::HeaderMap;
use serde_json::Value;

use super::error::TransportError;
use super::transport::{RawResponse, SignedRequest, Transport};

/// A scripted outcome for one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(RawResponse),
    Timeout,
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body parsed as JSON (`Value::Null` if it is not JSON).
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// Last path segment of the URL, i.e. the endpoint name.
    pub fn endpoint(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Default)]
struct MockState {
    replies: HashMap<String, VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

/// Mock transport serving queued replies keyed by endpoint name.
///
/// Clones share the same script and request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a reply for `endpoint` (e.g. `"init"`, `"checkName"`).
    pub fn push(&self, endpoint: &str, reply: MockReply) -> &Self {
        self.state()
            .replies
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a JSON response for `endpoint`.
    pub fn push_json(&self, endpoint: &str, status: u16, body: Value) -> &Self {
        self.push(
            endpoint,
            MockReply::Response(RawResponse {
                status,
                body: body.to_string().into_bytes(),
            }),
        )
    }

    /// Queue a raw, possibly non-JSON response for `endpoint`.
    pub fn push_raw(&self, endpoint: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.push(
            endpoint,
            MockReply::Response(RawResponse {
                status,
                body: body.into(),
            }),
        )
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Requests received for one endpoint.
    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.endpoint() == endpoint)
            .cloned()
            .collect()
    }
}

impl Transport for MockTransport {
    async fn post(&self, request: SignedRequest) -> Result<RawResponse, TransportError> {
        let recorded = RecordedRequest {
            url: request.url,
            headers: request.headers,
            body: request.body,
        };
        let endpoint = recorded.endpoint().to_string();

        let reply = {
            let mut state = self.state();
            state.requests.push(recorded);
            state
                .replies
                .get_mut(&endpoint)
                .and_then(VecDeque::pop_front)
        };

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Timeout) => Err(TransportError::Timeout),
            None => Ok(RawResponse {
                status: 404,
                body: format!("no scripted response for {endpoint}").into_bytes(),
            }),
        }
    }
}
