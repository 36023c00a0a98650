//! Grouping departures by station.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{DepartureEntry, StationRecord};

/// Departures of one station, in provider order.
#[derive(Debug, Clone, PartialEq)]
pub struct StationGroup {
    pub station: StationRecord,
    pub departures: Vec<DepartureEntry>,
}

/// Departures grouped per station, in the caller's station order.
///
/// Every requested station has a group, possibly empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedDepartures {
    groups: Vec<StationGroup>,
}

impl GroupedDepartures {
    /// Departures for a station id, or `None` if the station was not requested.
    pub fn get(&self, station_id: &str) -> Option<&[DepartureEntry]> {
        self.groups
            .iter()
            .find(|g| g.station.id == station_id)
            .map(|g| g.departures.as_slice())
    }

    /// Number of stations (not departures).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationGroup> {
        self.groups.iter()
    }

    pub fn station_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.station.id.as_str())
    }

    /// Total number of departures across all stations.
    pub fn departure_count(&self) -> usize {
        self.groups.iter().map(|g| g.departures.len()).sum()
    }
}

impl<'a> IntoIterator for &'a GroupedDepartures {
    type Item = &'a StationGroup;
    type IntoIter = std::slice::Iter<'a, StationGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group `departures` under the stations they belong to.
///
/// Output order follows `stations`; a repeated station id keeps its first
/// position. Within a station the departures keep their input order.
/// Departures for stations that were not requested are dropped.
pub fn group_by_station(
    departures: Vec<DepartureEntry>,
    stations: &[StationRecord],
) -> GroupedDepartures {
    let mut groups: Vec<StationGroup> = Vec::with_capacity(stations.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(stations.len());

    for station in stations {
        if index.contains_key(station.id.as_str()) {
            continue;
        }
        index.insert(station.id.as_str(), groups.len());
        groups.push(StationGroup {
            station: station.clone(),
            departures: Vec::new(),
        });
    }

    let mut dropped = 0usize;
    for departure in departures {
        match index.get(departure.station_id.as_str()) {
            Some(&i) => groups[i].departures.push(departure),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "departures for unrequested stations dropped");
    }

    GroupedDepartures { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str) -> StationRecord {
        StationRecord::new(id, id, "Hamburg")
    }

    fn dep(station_id: &str, line: &str, offset: i32) -> DepartureEntry {
        DepartureEntry {
            station_id: station_id.into(),
            line_name: line.into(),
            direction: "Somewhere".into(),
            vehicle_type: "BUS".into(),
            time_offset_minutes: offset,
            delay_seconds: None,
            platform: None,
            cancelled: false,
        }
    }

    #[test]
    fn empty_station_is_kept() {
        let stations = [station("A"), station("B")];
        let grouped = group_by_station(vec![dep("A", "5", 2)], &stations);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get("A").unwrap().len(), 1);
        assert_eq!(grouped.get("B"), Some(&[][..]));
        assert_eq!(grouped.station_ids().collect::<Vec<_>>(), ["A", "B"]);
    }

    #[test]
    fn provider_order_is_preserved_per_station() {
        let stations = [station("A"), station("B")];
        let grouped = group_by_station(
            vec![
                dep("B", "4", 1),
                dep("A", "5", 3),
                dep("B", "U1", 1),
                dep("A", "15", 2),
            ],
            &stations,
        );

        let lines = |id| {
            grouped
                .get(id)
                .unwrap()
                .iter()
                .map(|d| d.line_name.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(lines("A"), ["5", "15"]);
        assert_eq!(lines("B"), ["4", "U1"]);
    }

    #[test]
    fn station_order_follows_input_not_departures() {
        let stations = [station("B"), station("A")];
        let grouped = group_by_station(vec![dep("A", "5", 1), dep("B", "4", 2)], &stations);
        assert_eq!(grouped.station_ids().collect::<Vec<_>>(), ["B", "A"]);
    }

    #[test]
    fn unknown_station_departures_are_dropped() {
        let grouped = group_by_station(vec![dep("Z", "5", 1)], &[station("A")]);
        assert_eq!(grouped.departure_count(), 0);
        assert!(grouped.get("Z").is_none());
    }

    #[test]
    fn duplicate_station_collapses() {
        let stations = [station("A"), station("B"), station("A")];
        let grouped = group_by_station(vec![dep("A", "5", 1)], &stations);
        assert_eq!(grouped.station_ids().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(grouped.get("A").unwrap().len(), 1);
    }

    #[test]
    fn no_stations_no_groups() {
        let grouped = group_by_station(vec![dep("A", "5", 1)], &[]);
        assert!(grouped.is_empty());
    }
}
