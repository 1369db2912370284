//! Data source locations.
//!
//! Defaults point at the published Bluebikes and bike-network datasets.
//! Environment variables override them, and a JSON file replaces them:
//! ```json
//! {
//!   "stations": "data/bluebikes-stations.json",
//!   "trips": "data/bluebikes-traffic-2024-03.csv.gz",
//!   "lanes": [
//!     { "id": "bike-lanes-boston", "source": "data/boston.geojson" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::lanes::LaneLayer;

pub const DEFAULT_STATIONS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
pub const DEFAULT_TRIPS_URL: &str =
    "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";
pub const DEFAULT_BOSTON_LANES_URL: &str = "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson";
pub const DEFAULT_CAMBRIDGE_LANES_URL: &str = "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson";

/// Where stations, trips and bike-lane layers are loaded from. Each entry
/// is a URL or a local path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sources {
    pub stations: String,
    pub trips: String,
    #[serde(default)]
    pub lanes: Vec<LaneLayer>,
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            stations: DEFAULT_STATIONS_URL.to_string(),
            trips: DEFAULT_TRIPS_URL.to_string(),
            lanes: vec![
                LaneLayer::new("bike-lanes-boston", DEFAULT_BOSTON_LANES_URL),
                LaneLayer::new("bike-lanes-cambridge", DEFAULT_CAMBRIDGE_LANES_URL),
            ],
        }
    }
}

impl Sources {
    /// Defaults overridden by `BIKE_STATIONS_URL`, `BIKE_TRIPS_URL`,
    /// `BIKE_LANES_BOSTON_URL` and `BIKE_LANES_CAMBRIDGE_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut sources = Sources::default();
        if let Some(v) = lookup("BIKE_STATIONS_URL") {
            sources.stations = v;
        }
        if let Some(v) = lookup("BIKE_TRIPS_URL") {
            sources.trips = v;
        }
        for (layer, key) in sources
            .lanes
            .iter_mut()
            .zip(["BIKE_LANES_BOSTON_URL", "BIKE_LANES_CAMBRIDGE_URL"])
        {
            if let Some(v) = lookup(key) {
                layer.source = v;
            }
        }
        sources
    }

    /// Loads sources from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read sources file {path}"))?;
        let sources = serde_json::from_str(&content)
            .with_context(|| format!("malformed sources file {path}"))?;
        Ok(sources)
    }

    /// Applies per-source overrides, e.g. from command-line flags.
    pub fn with_overrides(mut self, stations: Option<String>, trips: Option<String>) -> Self {
        if let Some(stations) = stations {
            self.stations = stations;
        }
        if let Some(trips) = trips {
            self.trips = trips;
        }
        self
    }
}
