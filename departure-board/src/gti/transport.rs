//! The HTTP seam between the protocol client and the network.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;

use super::error::TransportError;

/// A fully signed POST request, ready to send.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    pub headers: HeaderMap,
    /// The exact bytes the signature was computed over.
    pub body: Vec<u8>,
}

/// Status and raw body of a provider response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends signed requests and returns the provider's answer.
///
/// Non-2xx statuses are returned as responses, not errors; only failures
/// to obtain a response at all are errors.
pub trait Transport: Send + Sync {
    fn post(
        &self,
        request: SignedRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport with a request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn post(&self, request: SignedRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .post(&request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation() {
        assert!(HttpTransport::new(Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn success_range() {
        let ok = RawResponse {
            status: 204,
            body: Vec::new(),
        };
        let moved = RawResponse {
            status: 301,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!moved.is_success());
    }
}
