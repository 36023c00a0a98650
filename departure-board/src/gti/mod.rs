//! GTI (Geofox Thin Interface) client.
//!
//! This module speaks the HVV real-time information protocol:
//! - every request body is compact JSON, signed with HMAC-SHA1 over the
//!   exact bytes sent, using the account's shared secret
//! - an `init` handshake issues a session id that later calls echo in a
//!   header; the provider may drop sessions at any time
//! - `checkName` resolves free text to station records, which must be
//!   passed back verbatim to `departureList`

mod client;
mod convert;
mod error;
mod mock;
mod session;
mod signing;
mod transport;
mod types;

pub use client::{DEFAULT_MAX_TIME_OFFSET, Endpoint, GtiClient, GtiConfig};
pub use convert::ConversionError;
pub use error::{GtiError, TransportError};
pub use mock::{MockReply, MockTransport, RecordedRequest};
pub use session::{Credentials, Session, SessionManager};
pub use signing::{AUTH_TYPE, auth_headers, canonical_json, sign};
pub use transport::{HttpTransport, RawResponse, SignedRequest, Transport};
pub use types::{
    CheckNameRequest, CheckNameResponse, DepartureDto, DepartureListRequest,
    DepartureListResponse, InitResponse,
};
