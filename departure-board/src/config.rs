//! Application configuration from the environment.

use std::time::Duration;

use crate::gti::{Credentials, DEFAULT_MAX_TIME_OFFSET, GtiConfig};

/// Station looked up when none is configured.
const DEFAULT_STATION: &str = "Grindelhof";

const DEFAULT_MAX_DEPARTURES: u32 = 20;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// How departures are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// One request covering every station.
    #[default]
    Batch,
    /// One concurrent request per station; a failing station is skipped.
    PerStation,
}

/// Everything the board binary needs to run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub base_url: Option<String>,
    /// Free-text station names, in board order.
    pub stations: Vec<String>,
    pub max_departures: u32,
    pub max_time_offset: u32,
    /// Refresh interval; `None` runs once.
    pub refresh: Option<Duration>,
    pub reauthenticate: bool,
    pub timeout_secs: Option<u64>,
    pub fetch_mode: FetchMode,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (key → value).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let username = get("GTI_USERNAME").ok_or(ConfigError::Missing("GTI_USERNAME"))?;
        let password = get("GTI_PASSWORD").ok_or(ConfigError::Missing("GTI_PASSWORD"))?;

        let stations = match get("GTI_STATIONS").or_else(|| get("HALTESTELLE")) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec![DEFAULT_STATION.to_string()],
        };

        let max_departures = parse_or(
            "GTI_MAX_DEPARTURES",
            get("GTI_MAX_DEPARTURES"),
            DEFAULT_MAX_DEPARTURES,
        )?;
        let max_time_offset = parse_or(
            "GTI_MAX_TIME_OFFSET",
            get("GTI_MAX_TIME_OFFSET"),
            DEFAULT_MAX_TIME_OFFSET,
        )?;
        let refresh_secs: u64 = parse_or("GTI_REFRESH_SECS", get("GTI_REFRESH_SECS"), 0)?;
        let timeout_secs = get("GTI_TIMEOUT_SECS")
            .map(|v| parse_value("GTI_TIMEOUT_SECS", v))
            .transpose()?;

        let reauthenticate = match get("GTI_REAUTH") {
            None => false,
            Some(v) => parse_bool("GTI_REAUTH", v)?,
        };

        let fetch_mode = match get("GTI_FETCH_MODE").as_deref().map(str::trim) {
            None | Some("batch") => FetchMode::Batch,
            Some("per-station") => FetchMode::PerStation,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "GTI_FETCH_MODE",
                    value: other.to_string(),
                    reason: "expected \"batch\" or \"per-station\"",
                });
            }
        };

        Ok(Self {
            credentials: Credentials::new(username, password),
            base_url: get("GTI_BASE_URL"),
            stations,
            max_departures,
            max_time_offset,
            refresh: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            reauthenticate,
            timeout_secs,
            fetch_mode,
        })
    }

    /// Client configuration derived from this config.
    pub fn gti_config(&self) -> GtiConfig {
        let mut config =
            GtiConfig::new(self.credentials.clone()).with_reauthenticate(self.reauthenticate);
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(secs);
        }
        config
    }
}

fn parse_value<N: std::str::FromStr>(key: &'static str, value: String) -> Result<N, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value,
        reason: "expected a non-negative integer",
    })
}

fn parse_or<N: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: N,
) -> Result<N, ConfigError> {
    value.map_or(Ok(default), |v| parse_value(key, v))
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const CREDENTIALS: [(&str, &str); 2] = [("GTI_USERNAME", "demo"), ("GTI_PASSWORD", "secret")];

    #[test]
    fn defaults() {
        let config = config(&CREDENTIALS).unwrap();

        assert_eq!(config.credentials.username(), "demo");
        assert_eq!(config.stations, ["Grindelhof"]);
        assert_eq!(config.max_departures, 20);
        assert_eq!(config.max_time_offset, 200);
        assert_eq!(config.refresh, None);
        assert!(!config.reauthenticate);
        assert_eq!(config.fetch_mode, FetchMode::Batch);

        let gti = config.gti_config();
        assert_eq!(gti.base_url, "https://gti.geofox.de/gti/public");
        assert_eq!(gti.timeout_secs, 30);
    }

    #[test]
    fn missing_credentials() {
        assert_eq!(
            config(&[("GTI_PASSWORD", "secret")]).unwrap_err(),
            ConfigError::Missing("GTI_USERNAME")
        );
        assert_eq!(
            config(&[("GTI_USERNAME", "demo"), ("GTI_PASSWORD", "  ")]).unwrap_err(),
            ConfigError::Missing("GTI_PASSWORD")
        );
    }

    #[test]
    fn station_list_is_split_and_trimmed() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("GTI_STATIONS", "Grindelhof, Bezirksamt Eimsbüttel ,,"));
        assert_eq!(
            config(&vars).unwrap().stations,
            ["Grindelhof", "Bezirksamt Eimsbüttel"]
        );
    }

    #[test]
    fn single_station_alias() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("HALTESTELLE", "Hoheluftbrücke"));
        assert_eq!(config(&vars).unwrap().stations, ["Hoheluftbrücke"]);
    }

    #[test]
    fn overrides() {
        let mut vars = CREDENTIALS.to_vec();
        vars.extend([
            ("GTI_BASE_URL", "http://localhost:8080/gti/public"),
            ("GTI_MAX_DEPARTURES", "5"),
            ("GTI_MAX_TIME_OFFSET", "60"),
            ("GTI_REFRESH_SECS", "30"),
            ("GTI_REAUTH", "yes"),
            ("GTI_TIMEOUT_SECS", "10"),
            ("GTI_FETCH_MODE", "per-station"),
        ]);
        let config = config(&vars).unwrap();

        assert_eq!(config.max_departures, 5);
        assert_eq!(config.max_time_offset, 60);
        assert_eq!(config.refresh, Some(Duration::from_secs(30)));
        assert!(config.reauthenticate);
        assert_eq!(config.fetch_mode, FetchMode::PerStation);

        let gti = config.gti_config();
        assert_eq!(gti.base_url, "http://localhost:8080/gti/public");
        assert_eq!(gti.timeout_secs, 10);
        assert!(gti.reauthenticate);
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("GTI_MAX_DEPARTURES", "many"));
        let err = config(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "GTI_MAX_DEPARTURES", .. }));
    }

    #[test]
    fn invalid_bool_is_reported() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("GTI_REAUTH", "sometimes"));
        assert!(config(&vars).is_err());
    }
}
