//! Trip records and the trips CSV loader.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::buckets::TripBuckets;
use crate::time::MinuteOfDay;

/// Wall-clock layouts tried in order before falling back to RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// A single bike-share trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn started_minute(&self) -> MinuteOfDay {
        MinuteOfDay::of(&self.started_at)
    }

    pub fn ended_minute(&self) -> MinuteOfDay {
        MinuteOfDay::of(&self.ended_at)
    }
}

/// A raw row of the trips CSV. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct TripRecord {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

impl TripRecord {
    fn into_trip(self) -> Option<Trip> {
        Some(Trip {
            started_at: parse_timestamp(&self.started_at)?,
            ended_at: parse_timestamp(&self.ended_at)?,
            start_station_id: self.start_station_id,
            end_station_id: self.end_station_id,
        })
    }
}

/// Parses a trip timestamp into its local wall-clock date-time.
///
/// Offset-qualified RFC 3339 values keep the wall-clock fields as written.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Result of bucketing a trips CSV.
#[derive(Debug, Default)]
pub struct TripLoad {
    pub buckets: TripBuckets,
    /// Rows dropped because a timestamp did not parse.
    pub skipped: usize,
}

/// Parses a trips CSV and buckets every trip in a single pass.
///
/// Rows with an unparseable `started_at` or `ended_at` are skipped and
/// counted in [`TripLoad::skipped`].
///
/// # Errors
///
/// Returns an error if the CSV is structurally malformed or lacks one of the
/// required columns.
pub fn parse_trips(bytes: &[u8]) -> Result<TripLoad> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut load = TripLoad::default();

    for (row, result) in rdr.deserialize().enumerate() {
        let record: TripRecord = result.with_context(|| format!("malformed trip row {}", row + 1))?;
        match record.into_trip() {
            Some(trip) => load.buckets.insert(trip),
            None => {
                debug!(row = row + 1, "Skipping trip with unparseable timestamp");
                load.skipped += 1;
            }
        }
    }

    if load.skipped > 0 {
        warn!(skipped = load.skipped, "Trips skipped due to unparseable timestamps");
    }
    info!(trips = load.buckets.trip_count(), "Trips bucketed");

    Ok(load)
}
