//! Station metadata parsed from the station information JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A bike-share station and its traffic for the current time filter.
///
/// `arrivals`, `departures` and `total_traffic` are derived; they are
/// overwritten on every filter change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Station {
    /// The station's `short_name`, which trips reference.
    pub id: String,
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
}

impl Station {
    pub fn new(id: &str, lon: f64, lat: f64) -> Self {
        Station {
            id: id.to_string(),
            lon,
            lat,
            ..Default::default()
        }
    }
}

#[derive(Deserialize)]
struct StationDocument {
    data: StationData,
}

#[derive(Deserialize)]
struct StationData {
    stations: Vec<StationRecord>,
}

/// Fields of a station entry we read; the rest are ignored.
#[derive(Deserialize)]
struct StationRecord {
    short_name: String,
    #[serde(default)]
    name: Option<String>,
    lon: f64,
    lat: f64,
}

/// Parses a station document of the form `{"data": {"stations": [...]}}`.
///
/// Station order is preserved and traffic starts at zero.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or a station lacks
/// `short_name`, `lon` or `lat`.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let doc: StationDocument =
        serde_json::from_slice(bytes).context("malformed station document")?;

    let stations: Vec<Station> = doc
        .data
        .stations
        .into_iter()
        .map(|r| Station {
            id: r.short_name,
            name: r.name,
            lon: r.lon,
            lat: r.lat,
            ..Default::default()
        })
        .collect();

    info!(stations = stations.len(), "Stations parsed");
    Ok(stations)
}
