//! GTI HTTP client.
//!
//! Every call is a signed POST: the body is encoded once with
//! [`canonical_json`], signed with the shared secret, and those same bytes
//! are handed to the transport. Session-scoped calls carry the session id.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

use crate::domain::{Clock, DepartureEntry, StationQuery, StationRecord, SystemClock, TimeAnchor};

use super::convert::{convert_check_name, convert_departures};
use super::error::{GtiError, TransportError};
use super::session::{Credentials, Session};
use super::signing::{auth_headers, canonical_json};
use super::transport::{HttpTransport, SignedRequest, Transport};
use super::types::{
    CheckNameRequest, CheckNameResponse, DepartureListRequest, DepartureListResponse,
    InitRequest, InitResponse, NameQuery,
};

/// Default base URL of the public GTI endpoints.
const DEFAULT_BASE_URL: &str = "https://gti.geofox.de/gti/public";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default look-ahead window for departures, in minutes.
pub const DEFAULT_MAX_TIME_OFFSET: u32 = 200;

/// Departure list API version sent with every request.
const API_VERSION: u32 = 63;

/// Configuration for the GTI client.
#[derive(Debug, Clone)]
pub struct GtiConfig {
    pub credentials: Credentials,
    /// Base URL for the API (defaults to production GTI)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Re-run the handshake and retry once when a session is rejected
    pub reauthenticate: bool,
}

impl GtiConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            reauthenticate: false,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_reauthenticate(mut self, enabled: bool) -> Self {
        self.reauthenticate = enabled;
        self
    }
}

/// GTI endpoints used by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Init,
    CheckName,
    DepartureList,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Init => "init",
            Endpoint::CheckName => "checkName",
            Endpoint::DepartureList => "departureList",
        }
    }
}

/// Which stations a departure request covers.
enum DepartureTarget<'a> {
    Single(&'a StationRecord),
    Batch(&'a [StationRecord]),
}

/// GTI API client.
///
/// Generic over the transport so tests can script provider responses.
/// A semaphore bounds the number of requests in flight.
pub struct GtiClient<T = HttpTransport> {
    transport: T,
    credentials: Credentials,
    base_url: String,
    semaphore: Arc<Semaphore>,
    clock: Arc<dyn Clock>,
    reauthenticate: bool,
}

impl GtiClient<HttpTransport> {
    /// Create a client talking HTTPS to the configured base URL.
    pub fn new(config: GtiConfig) -> Result<Self, GtiError> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> GtiClient<T> {
    pub fn with_transport(config: GtiConfig, transport: T) -> Self {
        Self {
            transport,
            credentials: config.credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            clock: Arc::new(SystemClock),
            reauthenticate: config.reauthenticate,
        }
    }

    /// Replace the wall-clock used for request time anchors.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn reauthenticate(&self) -> bool {
        self.reauthenticate
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Encode, sign and send `body`, then decode the response.
    async fn post_signed<B, R>(
        &self,
        endpoint: Endpoint,
        session: Option<&Session>,
        body: &B,
    ) -> Result<R, GtiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransportError::Status {
                status: 0,
                message: "request limiter closed".to_string(),
            })?;

        let body = canonical_json(body)?;
        let headers = auth_headers(&self.credentials, &body, session)?;
        trace!(endpoint = endpoint.path(), body = %String::from_utf8_lossy(&body), "request body");

        let request = SignedRequest {
            url: self.url(endpoint),
            headers,
            body,
        };
        let response = self.transport.post(request).await?;
        debug!(
            endpoint = endpoint.path(),
            status = response.status,
            "GTI response"
        );

        if !response.is_success() {
            return Err(GtiError::from_status(response.status, &response.body));
        }

        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| GtiError::protocol(e.to_string(), &response.body))?;

        if let Some(code) = value.get("returnCode").and_then(Value::as_str)
            && code != "OK"
        {
            let text = value
                .get("errorText")
                .and_then(Value::as_str)
                .unwrap_or("no error text");
            return Err(GtiError::protocol(
                format!("provider returned {code}: {text}"),
                &response.body,
            ));
        }

        serde_json::from_value(value).map_err(|e| GtiError::protocol(e.to_string(), &response.body))
    }

    /// Run the init handshake and obtain a session.
    pub async fn init_session(&self) -> Result<Session, GtiError> {
        let response: InitResponse = self.post_signed(Endpoint::Init, None, &InitRequest {}).await?;
        let id = response
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GtiError::Protocol {
                message: "init response has no session id".to_string(),
                body: None,
            })?;
        info!(user = self.credentials.username(), "GTI session initialized");
        Ok(Session::new(id))
    }

    /// Resolve a free-text name to candidate stations, in provider rank order.
    ///
    /// No match is an empty list, not an error.
    pub async fn find_station(
        &self,
        session: &Session,
        query: &StationQuery,
    ) -> Result<Vec<StationRecord>, GtiError> {
        let body = CheckNameRequest {
            the_name: NameQuery {
                name: &query.name,
                kind: &query.kind,
            },
            max_list: query.max_results,
        };
        let response: CheckNameResponse = self
            .post_signed(Endpoint::CheckName, Some(session), &body)
            .await?;
        let stations = convert_check_name(response).map_err(|e| GtiError::Protocol {
            message: e.to_string(),
            body: None,
        })?;
        debug!(name = %query.name, found = stations.len(), "name check");
        Ok(stations)
    }

    /// Departures for one station, anchored at the current time.
    ///
    /// Every entry is tagged with `station.id`.
    pub async fn get_departures(
        &self,
        session: &Session,
        station: &StationRecord,
        max_departures: u32,
        max_time_offset: u32,
    ) -> Result<Vec<DepartureEntry>, GtiError> {
        self.fetch_departures(
            session,
            DepartureTarget::Single(station),
            max_departures,
            max_time_offset,
        )
        .await
    }

    /// Departures for several stations in one request.
    ///
    /// Entries are tagged with the station id the provider reports and keep
    /// the provider's order.
    pub async fn get_departures_multi(
        &self,
        session: &Session,
        stations: &[StationRecord],
        max_departures: u32,
        max_time_offset: u32,
    ) -> Result<Vec<DepartureEntry>, GtiError> {
        if stations.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_departures(
            session,
            DepartureTarget::Batch(stations),
            max_departures,
            max_time_offset,
        )
        .await
    }

    /// One single-station request per station, issued concurrently.
    ///
    /// Results are returned in `stations` order regardless of completion
    /// order, one result per station, so a failing station can be skipped.
    pub async fn get_departures_each(
        &self,
        session: &Session,
        stations: &[StationRecord],
        max_departures: u32,
        max_time_offset: u32,
    ) -> Vec<Result<Vec<DepartureEntry>, GtiError>> {
        let futures = stations
            .iter()
            .map(|station| self.get_departures(session, station, max_departures, max_time_offset));
        join_all(futures).await
    }

    /// [`get_departures_each`](Self::get_departures_each), but a rejected
    /// session for any station fails the whole call.
    ///
    /// Other per-station failures stay in their slot. Surfacing the auth
    /// failure lets [`SessionManager::call`](super::SessionManager::call)
    /// renew the session and retry every station.
    pub async fn try_departures_each(
        &self,
        session: &Session,
        stations: &[StationRecord],
        max_departures: u32,
        max_time_offset: u32,
    ) -> Result<Vec<Result<Vec<DepartureEntry>, GtiError>>, GtiError> {
        let results = self
            .get_departures_each(session, stations, max_departures, max_time_offset)
            .await;
        surface_auth_failure(results)
    }

    async fn fetch_departures(
        &self,
        session: &Session,
        target: DepartureTarget<'_>,
        max_departures: u32,
        max_time_offset: u32,
    ) -> Result<Vec<DepartureEntry>, GtiError> {
        let time = TimeAnchor::now(self.clock.as_ref());
        let (station, stations, tag) = match target {
            DepartureTarget::Single(station) => (Some(station), None, Some(station.id.as_str())),
            DepartureTarget::Batch(stations) => (None, Some(stations), None),
        };

        let body = DepartureListRequest {
            version: API_VERSION,
            station,
            stations,
            time: &time,
            max_list: max_departures,
            max_time_offset,
            use_realtime: true,
        };

        let response: DepartureListResponse = self
            .post_signed(Endpoint::DepartureList, Some(session), &body)
            .await?;

        let departures = convert_departures(response.departures.unwrap_or_default(), tag)
            .map_err(|e| GtiError::Protocol {
                message: e.to_string(),
                body: None,
            })?;
        debug!(
            date = %time.date,
            time = %time.time,
            count = departures.len(),
            "departure list"
        );
        Ok(departures)
    }
}

fn surface_auth_failure(
    results: Vec<Result<Vec<DepartureEntry>, GtiError>>,
) -> Result<Vec<Result<Vec<DepartureEntry>, GtiError>>, GtiError> {
    let mut kept = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Err(e) if e.is_auth() => return Err(e),
            other => kept.push(other),
        }
    }
    Ok(kept)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
