//! Canonical request encoding and HMAC-SHA1 request signing.
//!
//! The provider verifies a signature over the exact body bytes it receives,
//! so the bytes returned by [`canonical_json`] are both signed and sent.
//! They are never re-serialized in between.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use sha1::Sha1;

use super::error::GtiError;
use super::session::{Credentials, Session};

type HmacSha1 = Hmac<Sha1>;

/// Value of the `geofox-auth-type` header.
pub const AUTH_TYPE: &str = "HmacSHA1";

pub const HEADER_AUTH_TYPE: &str = "geofox-auth-type";
pub const HEADER_AUTH_USER: &str = "geofox-auth-user";
pub const HEADER_AUTH_SIGNATURE: &str = "geofox-auth-signature";
pub const HEADER_SESSION_ID: &str = "geofox-session-id";

/// Encode a request body as compact JSON.
///
/// Struct fields are emitted in declaration order and `serde_json::Value`
/// maps in sorted key order, with no whitespace and UTF-8 text left
/// unescaped. Logically equal inputs therefore give identical bytes.
pub fn canonical_json<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>, GtiError> {
    Ok(serde_json::to_vec(body)?)
}

/// Compute the base64 HMAC-SHA1 of `body` keyed with `secret`.
///
/// # Examples
///
/// ```
/// use departure_board::gti::sign;
///
/// let sig = sign(b"The quick brown fox jumps over the lazy dog", b"key");
/// assert_eq!(sig, "3nybhbi3iqa8ino29wqQcBydtNk=");
/// ```
pub fn sign(body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the signed header set for a request carrying `body`.
pub fn auth_headers(
    credentials: &Credentials,
    body: &[u8],
    session: Option<&Session>,
) -> Result<HeaderMap, GtiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(HEADER_AUTH_TYPE),
        HeaderValue::from_static(AUTH_TYPE),
    );

    let user = HeaderValue::from_str(credentials.username())
        .map_err(|_| GtiError::InvalidCredentials("username is not a valid header value"))?;
    headers.insert(HeaderName::from_static(HEADER_AUTH_USER), user);

    // base64 output is always a valid header value
    let signature = HeaderValue::from_str(&sign(body, credentials.secret()))
        .map_err(|_| GtiError::InvalidCredentials("signature is not a valid header value"))?;
    headers.insert(HeaderName::from_static(HEADER_AUTH_SIGNATURE), signature);

    if let Some(session) = session {
        let id = HeaderValue::from_str(session.id())
            .map_err(|_| GtiError::InvalidCredentials("session id is not a valid header value"))?;
        headers.insert(HeaderName::from_static(HEADER_SESSION_ID), id);
    }

    Ok(headers)
}
