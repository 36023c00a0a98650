use std::error::Error;

use departure_board::board::{GroupedDepartures, Renderer, TextRenderer, group_by_station};
use departure_board::cache::{CachedStationResolver, StationCacheConfig};
use departure_board::config::{AppConfig, FetchMode};
use departure_board::domain::{StationQuery, StationRecord};
use departure_board::gti::{GtiClient, GtiError, HttpTransport, SessionManager};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("departure_board=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let client = GtiClient::new(config.gti_config())?;
    let sessions = SessionManager::new(&client);
    let resolver = CachedStationResolver::new(&client, &StationCacheConfig::default());

    let stations = resolve_stations(&sessions, &resolver, &config.stations).await?;
    if stations.is_empty() {
        return Err("no station found for any configured name".into());
    }

    let mut renderer = TextRenderer::stdout();
    let mut interval = config.refresh.map(tokio::time::interval);

    loop {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        match fetch_board(&client, &sessions, &stations, &config).await {
            Ok(board) => renderer.render(&board)?,
            // keep the loop alive; a single run reports the failure
            Err(e) if interval.is_some() => warn!("departure fetch failed: {e}"),
            Err(e) => return Err(e.into()),
        }

        if interval.is_none() {
            return Ok(());
        }
    }
}

/// Resolve each configured name to its best-ranked station.
///
/// Names without a match are skipped. A failed handshake aborts.
async fn resolve_stations(
    sessions: &SessionManager<'_, HttpTransport>,
    resolver: &CachedStationResolver<'_, HttpTransport>,
    names: &[String],
) -> Result<Vec<StationRecord>, GtiError> {
    sessions.session().await?;

    let mut stations = Vec::with_capacity(names.len());
    for name in names {
        let query = StationQuery::station(name.as_str());
        let found = sessions
            .call(|session| {
                let query = &query;
                async move { resolver.find_station(&session, query).await }
            })
            .await;

        match found {
            Ok(candidates) => match candidates.first() {
                Some(station) => {
                    info!(name = %name, id = %station.id, "using station {}", station.display_name());
                    stations.push(station.clone());
                }
                None => warn!(name = %name, "no station found"),
            },
            Err(e) => warn!(name = %name, "no station found: {e}"),
        }
    }
    Ok(stations)
}

async fn fetch_board(
    client: &GtiClient<HttpTransport>,
    sessions: &SessionManager<'_, HttpTransport>,
    stations: &[StationRecord],
    config: &AppConfig,
) -> Result<GroupedDepartures, GtiError> {
    let departures = match config.fetch_mode {
        FetchMode::Batch => {
            sessions
                .call(|session| async move {
                    client
                        .get_departures_multi(
                            &session,
                            stations,
                            config.max_departures,
                            config.max_time_offset,
                        )
                        .await
                })
                .await?
        }
        FetchMode::PerStation => {
            let results = sessions
                .call(|session| async move {
                    client
                        .try_departures_each(
                            &session,
                            stations,
                            config.max_departures,
                            config.max_time_offset,
                        )
                        .await
                })
                .await?;

            let mut departures = Vec::new();
            for (station, result) in stations.iter().zip(results) {
                match result {
                    Ok(found) => departures.extend(found),
                    Err(e) => warn!(station = %station.id, "skipping station: {e}"),
                }
            }
            departures
        }
    };

    Ok(group_by_station(departures, stations))
}
