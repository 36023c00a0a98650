//! GTI client error types.

/// Errors raised while talking to the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network failure (connection refused, TLS, reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Provider answered with a non-success, non-auth status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(err)
        }
    }
}

/// Errors from the GTI client.
#[derive(Debug, thiserror::Error)]
pub enum GtiError {
    /// Signature or session rejected by the provider
    #[error("authentication rejected ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Network failure, timeout or unexpected status
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response was not the JSON shape we expect
    #[error("protocol error: {message}")]
    Protocol {
        message: String,
        body: Option<String>,
    },

    /// Request body could not be serialized
    #[error("failed to encode request body: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Credentials cannot be sent as header values
    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),
}

/// How much of a response body to keep in error values.
const BODY_EXCERPT_CHARS: usize = 500;

impl GtiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = excerpt(body);
        match status {
            401 | 403 => GtiError::Auth { status, message },
            _ => GtiError::Transport(TransportError::Status { status, message }),
        }
    }

    /// A malformed response, keeping an excerpt of the body for diagnostics.
    pub fn protocol(message: impl Into<String>, body: &[u8]) -> Self {
        GtiError::Protocol {
            message: message.into(),
            body: Some(excerpt(body)),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, GtiError::Auth { .. })
    }
}

fn excerpt(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_EXCERPT_CHARS)
        .collect()
}
