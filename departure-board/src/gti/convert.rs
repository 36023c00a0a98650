//! Conversion from GTI DTOs to domain types.

use tracing::warn;

use crate::domain::{DepartureEntry, StationRecord};

use super::types::{CheckNameResponse, DepartureDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Pick the candidate list out of a name check response.
///
/// A non-empty list wins over an empty one; if only empty lists are present
/// the result is empty. Neither key present is an error.
pub fn convert_check_name(
    response: CheckNameResponse,
) -> Result<Vec<StationRecord>, ConversionError> {
    match (response.results, response.stop) {
        (Some(results), _) if !results.is_empty() => Ok(results),
        (_, Some(stop)) if !stop.is_empty() => Ok(stop),
        (None, None) => Err(ConversionError::MissingField("results")),
        _ => Ok(Vec::new()),
    }
}

/// Convert one provider departure.
///
/// `station_id` tags the entry when the request named a single station;
/// batch requests pass `None` and the id is read from the departure itself.
pub fn convert_departure(
    dto: DepartureDto,
    station_id: Option<&str>,
) -> Result<DepartureEntry, ConversionError> {
    let station_id = match station_id {
        Some(id) => id.to_string(),
        None => dto
            .station
            .and_then(|s| s.id)
            .ok_or(ConversionError::MissingField("departures[].station.id"))?,
    };

    let line = dto
        .line
        .ok_or(ConversionError::MissingField("departures[].line"))?;
    let line_name = line
        .name
        .ok_or(ConversionError::MissingField("departures[].line.name"))?;

    Ok(DepartureEntry {
        station_id,
        line_name,
        direction: line.direction.unwrap_or_default(),
        vehicle_type: line.kind.and_then(|k| k.simple_type).unwrap_or_default(),
        time_offset_minutes: dto.time_offset.unwrap_or(0),
        delay_seconds: dto.delay,
        platform: dto.realtime_platform.or(dto.platform),
        cancelled: dto.cancelled.unwrap_or(false),
    })
}

/// Convert a full departure list.
///
/// A single-station list fails on the first malformed entry. A batch list
/// skips malformed entries so one bad departure does not hide the other
/// stations' boards.
pub fn convert_departures(
    departures: Vec<DepartureDto>,
    station_id: Option<&str>,
) -> Result<Vec<DepartureEntry>, ConversionError> {
    if station_id.is_some() {
        return departures
            .into_iter()
            .map(|dto| convert_departure(dto, station_id))
            .collect();
    }

    let total = departures.len();
    let converted: Vec<_> = departures
        .into_iter()
        .filter_map(|dto| match convert_departure(dto, None) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping batch departure: {e}");
                None
            }
        })
        .collect();
    if converted.len() < total {
        warn!(
            skipped = total - converted.len(),
            kept = converted.len(),
            "batch departure list had malformed entries"
        );
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(value: serde_json::Value) -> DepartureDto {
        serde_json::from_value(value).unwrap()
    }

    fn check_name(value: serde_json::Value) -> CheckNameResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn results_key_preferred_when_populated() {
        let stations = convert_check_name(check_name(json!({
            "results": [{"id": "Master:11035", "name": "Grindelhof"}],
            "stop": [{"id": "Master:99999", "name": "Other"}]
        })))
        .unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "Master:11035");
    }

    #[test]
    fn stop_key_used_when_results_empty() {
        let stations = convert_check_name(check_name(json!({
            "results": [],
            "stop": [{"id": "Master:11035"}, {"id": "Master:11036"}]
        })))
        .unwrap();
        assert_eq!(stations.len(), 2);
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let stations = convert_check_name(check_name(json!({"results": []}))).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn missing_both_keys_is_an_error() {
        let err = convert_check_name(check_name(json!({"returnCode": "OK"}))).unwrap_err();
        assert_eq!(err, ConversionError::MissingField("results"));
    }

    #[test]
    fn single_station_tagging() {
        let entry = convert_departure(
            dto(json!({
                "line": {"name": "U1", "direction": "Norderstedt"},
                "timeOffset": -1
            })),
            Some("Master:11035"),
        )
        .unwrap();

        assert_eq!(entry.station_id, "Master:11035");
        assert_eq!(entry.line_name, "U1");
        assert_eq!(entry.direction, "Norderstedt");
        assert_eq!(entry.vehicle_type, "");
        assert_eq!(entry.time_offset_minutes, -1);
        assert!(!entry.cancelled);
    }

    #[test]
    fn batch_entry_reads_station_id() {
        let entry = convert_departure(
            dto(json!({
                "line": {"name": "5", "direction": "Burgwedel", "type": {"simpleType": "BUS"}},
                "timeOffset": 4,
                "station": {"id": "Master:11028"},
                "platform": "Pos. 1",
                "realtimePlatform": "Pos. 2"
            })),
            None,
        )
        .unwrap();

        assert_eq!(entry.station_id, "Master:11028");
        assert_eq!(entry.vehicle_type, "BUS");
        assert_eq!(entry.platform.as_deref(), Some("Pos. 2"));
    }

    #[test]
    fn batch_entry_without_station_is_rejected() {
        let err = convert_departure(dto(json!({"line": {"name": "U1"}})), None).unwrap_err();
        assert_eq!(
            err,
            ConversionError::MissingField("departures[].station.id")
        );
    }

    #[test]
    fn batch_list_skips_malformed_entries() {
        let entries = convert_departures(
            vec![
                dto(json!({"line": {"name": "U1"}})),
                dto(json!({"line": {"name": "5"}, "station": {"id": "Master:11028"}})),
                dto(json!({"line": {}, "station": {"id": "Master:11035"}})),
            ],
            None,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].station_id, "Master:11028");
    }

    #[test]
    fn single_list_rejects_malformed_entries() {
        let err = convert_departures(
            vec![
                dto(json!({"line": {"name": "U1"}})),
                dto(json!({"line": {"direction": "X"}})),
            ],
            Some("Master:1"),
        )
        .unwrap_err();
        assert_eq!(err, ConversionError::MissingField("departures[].line.name"));
    }

    #[test]
    fn missing_time_offset_means_now() {
        let entry =
            convert_departure(dto(json!({"line": {"name": "U1"}})), Some("Master:1")).unwrap();
        assert_eq!(entry.time_offset_minutes, 0);
    }

    #[test]
    fn missing_line_name_is_rejected() {
        let err = convert_departure(dto(json!({"line": {"direction": "X"}})), Some("Master:1"))
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingField("departures[].line.name"));
    }
}
