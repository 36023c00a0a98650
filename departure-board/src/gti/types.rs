//! GTI request and response DTOs.
//!
//! Request types borrow from domain values so the body is serialized
//! straight from what the caller passed in. Response types use `Option`
//! liberally because the provider omits empty and default-valued fields.

use serde::{Deserialize, Serialize};

use crate::domain::{StationKind, StationRecord, TimeAnchor};

/// Body of the session init call: always `{}`.
#[derive(Debug, Serialize)]
pub struct InitRequest {}

/// Body of the `checkName` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameRequest<'a> {
    pub the_name: NameQuery<'a>,
    pub max_list: u32,
}

#[derive(Debug, Serialize)]
pub struct NameQuery<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a StationKind,
}

/// Body of the `departureList` call.
///
/// Exactly one of `station` and `stations` is set: the provider
/// distinguishes single and batch requests by which field is present.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureListRequest<'a> {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<&'a StationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stations: Option<&'a [StationRecord]>,
    pub time: &'a TimeAnchor,
    pub max_list: u32,
    pub max_time_offset: u32,
    pub use_realtime: bool,
}

/// Response of the session init call.
#[derive(Debug, Clone, Deserialize)]
pub struct InitResponse {
    pub id: Option<String>,
}

/// Response of the `checkName` call.
///
/// Depending on the provider version the candidates arrive under
/// `results` or under `stop`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckNameResponse {
    pub results: Option<Vec<StationRecord>>,
    pub stop: Option<Vec<StationRecord>>,
}

/// Response of the `departureList` call.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureListResponse {
    /// Provider's reference time for the countdowns.
    pub time: Option<GtiTime>,
    pub departures: Option<Vec<DepartureDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GtiTime {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// A single departure as sent by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDto {
    pub line: Option<LineDto>,

    /// Minutes from the reference time; omitted when zero.
    pub time_offset: Option<i32>,

    /// Realtime delay in seconds.
    pub delay: Option<i32>,

    /// Station the departure belongs to (batch requests only).
    pub station: Option<StationRefDto>,

    pub platform: Option<String>,

    pub realtime_platform: Option<String>,

    pub cancelled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineDto {
    pub name: Option<String>,
    pub direction: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ServiceTypeDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeDto {
    pub simple_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationRefDto {
    pub id: Option<String>,
}
