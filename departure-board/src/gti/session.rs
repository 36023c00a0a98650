//! Credentials, sessions and the re-authentication policy.

use std::fmt;
use std::future::Future;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::GtiClient;
use super::error::GtiError;
use super::transport::Transport;

/// Account name and shared signing secret.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    secret: Vec<u8>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: password.into().into_bytes(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// An opaque session token issued by the init handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Holds the current session and renews it when the provider rejects it.
///
/// The session is created lazily on first use. When re-authentication is
/// enabled, a call failing with [`GtiError::Auth`] triggers one new
/// handshake and exactly one retry of that call.
pub struct SessionManager<'c, T> {
    client: &'c GtiClient<T>,
    current: RwLock<Option<Session>>,
    reauthenticate: bool,
}

impl<'c, T: Transport> SessionManager<'c, T> {
    /// Create a manager using the client's re-authentication setting.
    pub fn new(client: &'c GtiClient<T>) -> Self {
        Self {
            client,
            current: RwLock::new(None),
            reauthenticate: client.reauthenticate(),
        }
    }

    /// Override the re-authentication setting.
    pub fn with_reauthenticate(mut self, enabled: bool) -> Self {
        self.reauthenticate = enabled;
        self
    }

    /// The held session, running the handshake if there is none yet.
    pub async fn session(&self) -> Result<Session, GtiError> {
        if let Some(session) = self.current.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut guard = self.current.write().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }
        let session = self.client.init_session().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Replace `rejected` with a fresh session.
    ///
    /// If another caller already replaced it, the held session is returned
    /// without a new handshake. On failure the held session is discarded.
    pub async fn renew(&self, rejected: &Session) -> Result<Session, GtiError> {
        let mut guard = self.current.write().await;
        if let Some(current) = guard.as_ref()
            && current != rejected
        {
            debug!("session already renewed");
            return Ok(current.clone());
        }

        *guard = None;
        let session = self.client.init_session().await?;
        info!("session renewed");
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Run `op` with the current session, applying the re-authentication policy.
    pub async fn call<F, Fut, R>(&self, op: F) -> Result<R, GtiError>
    where
        F: Fn(Session) -> Fut,
        Fut: Future<Output = Result<R, GtiError>>,
    {
        let session = self.session().await?;
        match op(session.clone()).await {
            Err(err) if err.is_auth() && self.reauthenticate => {
                warn!(error = %err, "session rejected, re-authenticating once");
                let session = self.renew(&session).await?;
                op(session).await
            }
            Err(err) => {
                debug!(error = %err, "call failed");
                Err(err)
            }
            ok => ok,
        }
    }
}
