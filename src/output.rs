//! Output formatting and persistence for station traffic.
//!
//! Supports pretty-printing, JSON logging, and CSV export.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::stations::Station;
use crate::time::TimeFilter;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row: a station's traffic under a given filter.
#[derive(Debug, Serialize)]
pub struct TrafficRecord<'a> {
    pub time_filter: i32,
    pub station_id: &'a str,
    pub lon: f64,
    pub lat: f64,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
}

impl<'a> TrafficRecord<'a> {
    pub fn new(filter: TimeFilter, station: &'a Station) -> Self {
        TrafficRecord {
            time_filter: filter.slider_value(),
            station_id: &station.id,
            lon: station.lon,
            lat: station.lat,
            arrivals: station.arrivals,
            departures: station.departures,
            total_traffic: station.total_traffic,
        }
    }
}

/// Logs stations using Rust's debug pretty-print format.
pub fn print_pretty(stations: &[Station]) {
    debug!("{:#?}", stations);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends one row per station to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_traffic(path: &str, filter: TimeFilter, stations: &[Station]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = stations.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on a new file
        .from_writer(file);

    for station in stations {
        writer.serialize(TrafficRecord::new(filter, station))?;
    }
    writer.flush()?;

    Ok(())
}
