//! The traffic map state: stations, trip buckets and the active filter.

use anyhow::Result;
use tracing::{debug, info};

use crate::buckets::TripBuckets;
use crate::config::Sources;
use crate::fetch::{HttpClient, load_source};
use crate::markers::{Marker, build_markers};
use crate::stations::{Station, parse_stations};
use crate::time::TimeFilter;
use crate::traffic::compute_station_traffic;
use crate::trips::parse_trips;

/// Owns everything the time slider acts on. Buckets are built once; station
/// traffic is recomputed on every [`TrafficMap::set_time_filter`].
#[derive(Debug, Clone)]
pub struct TrafficMap {
    stations: Vec<Station>,
    buckets: TripBuckets,
    filter: TimeFilter,
    skipped_trips: usize,
}

impl TrafficMap {
    /// Builds the map with traffic computed for [`TimeFilter::Any`].
    pub fn new(stations: Vec<Station>, buckets: TripBuckets) -> Self {
        let stations = compute_station_traffic(stations, &buckets, TimeFilter::Any);
        TrafficMap {
            stations,
            buckets,
            filter: TimeFilter::Any,
            skipped_trips: 0,
        }
    }

    /// Loads stations, then trips, and computes unfiltered traffic.
    ///
    /// # Errors
    ///
    /// Fails on the first source that cannot be fetched or parsed.
    #[tracing::instrument(skip_all, fields(stations = %sources.stations, trips = %sources.trips))]
    pub async fn load<C: HttpClient>(client: &C, sources: &Sources) -> Result<Self> {
        let stations = parse_stations(&load_source(client, &sources.stations).await?)?;
        let load = parse_trips(&load_source(client, &sources.trips).await?)?;

        let mut map = TrafficMap::new(stations, load.buckets);
        map.skipped_trips = load.skipped;
        info!(
            stations = map.stations.len(),
            trips = map.buckets.trip_count(),
            skipped = map.skipped_trips,
            "Traffic map loaded"
        );
        Ok(map)
    }

    /// Handles a filter change: recomputes and returns station traffic.
    pub fn set_time_filter(&mut self, filter: TimeFilter) -> &[Station] {
        let stations = std::mem::take(&mut self.stations);
        self.stations = compute_station_traffic(stations, &self.buckets, filter);
        self.filter = filter;
        debug!(filter = %filter, "Station traffic recomputed");
        &self.stations
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn buckets(&self) -> &TripBuckets {
        &self.buckets
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Rows dropped at load time for unparseable timestamps.
    pub fn skipped_trips(&self) -> usize {
        self.skipped_trips
    }

    pub fn markers(&self) -> Vec<Marker> {
        build_markers(&self.stations)
    }

    /// Slider label, `None` while the "(any time)" label is shown.
    pub fn time_label(&self) -> Option<String> {
        self.filter.label()
    }
}
