//! Station records and name queries.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Kind of location the provider resolves a name to.
///
/// Values outside the known set are kept as [`StationKind::Other`] so a
/// record can be sent back with the exact `type` string it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StationKind {
    Station,
    Address,
    Poi,
    Coordinate,
    Other(String),
}

impl StationKind {
    pub fn as_str(&self) -> &str {
        match self {
            StationKind::Station => "STATION",
            StationKind::Address => "ADDRESS",
            StationKind::Poi => "POI",
            StationKind::Coordinate => "COORDINATE",
            StationKind::Other(raw) => raw,
        }
    }
}

impl From<String> for StationKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "STATION" => StationKind::Station,
            "ADDRESS" => StationKind::Address,
            "POI" => StationKind::Poi,
            "COORDINATE" => StationKind::Coordinate,
            _ => StationKind::Other(raw),
        }
    }
}

impl Serialize for StationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(StationKind::from)
    }
}

/// The provider's canonical representation of a stop.
///
/// Records are returned by the name check and must be echoed back verbatim
/// in departure requests, so any field this type does not model is kept in
/// `extra` and serialized again after the known fields.
///
/// # Examples
///
/// ```
/// use departure_board::domain::StationRecord;
///
/// let station = StationRecord::new("Master:11035", "Grindelhof", "Hamburg");
/// assert_eq!(station.display_name(), "Grindelhof");
///
/// let station = station.with_combined_name("Hamburg, Grindelhof");
/// assert_eq!(station.display_name(), "Hamburg, Grindelhof");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// Provider-namespaced identifier, e.g. `Master:11035`.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StationKind>,

    /// Provider fields not modelled above (coordinates, provider tags, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StationRecord {
    /// Build a station record by hand, e.g. from configuration.
    pub fn new(id: impl Into<String>, name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            city: Some(city.into()),
            combined_name: None,
            kind: Some(StationKind::Station),
            extra: Map::new(),
        }
    }

    /// Set the combined "City, Name" label.
    pub fn with_combined_name(mut self, combined: impl Into<String>) -> Self {
        self.combined_name = Some(combined.into());
        self
    }

    /// Name to show on a board: the combined name if present, else the plain name.
    pub fn display_name(&self) -> &str {
        match self.combined_name.as_deref() {
            Some(combined) if !combined.is_empty() => combined,
            _ => match self.name.as_deref() {
                Some(name) if !name.is_empty() => name,
                _ => &self.id,
            },
        }
    }
}

/// Default number of candidates requested from the name check.
const DEFAULT_MAX_RESULTS: u32 = 10;

/// A free-text station lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationQuery {
    pub name: String,
    pub kind: StationKind,
    pub max_results: u32,
}

impl StationQuery {
    /// Query for stations matching `name`.
    pub fn station(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StationKind::Station,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Limit the number of candidates returned.
    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_full_record() {
        let station: StationRecord = serde_json::from_value(json!({
            "id": "Master:11035",
            "name": "Grindelhof",
            "city": "Hamburg",
            "combinedName": "Hamburg, Grindelhof",
            "type": "STATION",
            "coordinate": {"x": 9.98, "y": 53.57},
            "hasStationInformation": true
        }))
        .unwrap();

        assert_eq!(station.id, "Master:11035");
        assert_eq!(station.kind, Some(StationKind::Station));
        assert_eq!(station.display_name(), "Hamburg, Grindelhof");
        assert_eq!(station.extra.len(), 2);
        assert!(station.extra.contains_key("coordinate"));
    }

    #[test]
    fn unknown_fields_are_echoed() {
        let input = json!({
            "id": "Master:11028",
            "city": "Hamburg",
            "combinedName": "Hamburg, Bezirksamt Eimsbüttel",
            "type": "STATION",
            "provider": "HVV"
        });
        let station: StationRecord = serde_json::from_value(input.clone()).unwrap();
        let echoed = serde_json::to_value(&station).unwrap();
        assert_eq!(echoed, input);
    }

    #[test]
    fn missing_name_is_not_invented() {
        let station: StationRecord =
            serde_json::from_value(json!({"id": "Master:1", "city": "Hamburg"})).unwrap();
        let bytes = serde_json::to_string(&station).unwrap();
        assert_eq!(bytes, r#"{"id":"Master:1","city":"Hamburg"}"#);
        assert_eq!(station.display_name(), "Master:1");
    }

    #[test]
    fn unknown_kind_is_echoed_unchanged() {
        let input = json!({"id": "Master:1", "name": "X", "type": "FERRY_PIER"});
        let station: StationRecord = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(
            station.kind,
            Some(StationKind::Other("FERRY_PIER".to_string()))
        );
        assert_eq!(serde_json::to_value(&station).unwrap(), input);
    }

    #[test]
    fn empty_name_and_city_are_echoed() {
        let input = json!({"id": "Master:2", "name": "", "city": ""});
        let station: StationRecord = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(station.name.as_deref(), Some(""));
        assert_eq!(serde_json::to_value(&station).unwrap(), input);
        assert_eq!(station.display_name(), "Master:2");
    }

    #[test]
    fn known_kinds_use_provider_spelling() {
        for (kind, raw) in [
            (StationKind::Station, "STATION"),
            (StationKind::Address, "ADDRESS"),
            (StationKind::Poi, "POI"),
            (StationKind::Coordinate, "COORDINATE"),
        ] {
            assert_eq!(serde_json::to_value(&kind).unwrap(), json!(raw));
            assert_eq!(StationKind::from(raw.to_string()), kind);
        }
    }

    #[test]
    fn query_defaults() {
        let query = StationQuery::station("Grindelhof");
        assert_eq!(query.kind, StationKind::Station);
        assert_eq!(query.max_results, 10);
        assert_eq!(query.with_max_results(3).max_results, 3);
    }
}
