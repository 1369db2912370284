//! Marker data for drawing stations: radius, departure mix and title.
//!
//! Screen placement is left to the renderer; markers carry lon/lat only.

use serde::Serialize;

use crate::stations::Station;

/// Largest marker radius, in pixels.
pub const MAX_RADIUS: f64 = 25.0;

/// Square-root scale from `[0, domain_max]` onto `[0, range_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain_max: f64,
    range_max: f64,
}

impl SqrtScale {
    pub fn new(domain_max: f64, range_max: f64) -> Self {
        Self {
            domain_max,
            range_max,
        }
    }

    /// Radius scale for `stations`. With no stations or no traffic the
    /// domain falls back to `[0, 1]`.
    pub fn radius(stations: &[Station]) -> Self {
        let max = stations.iter().map(|s| s.total_traffic).max().unwrap_or(0);
        let domain_max = if max == 0 { 1.0 } else { max as f64 };
        Self::new(domain_max, MAX_RADIUS)
    }

    pub fn domain(&self) -> [f64; 2] {
        [0.0, self.domain_max]
    }

    pub fn scale(&self, value: f64) -> f64 {
        value.max(0.0).sqrt() / self.domain_max.sqrt() * self.range_max
    }
}

/// Quantize scale over `[0, 1]` onto the outputs `0, 0.5, 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowScale;

impl FlowScale {
    const OUTPUTS: [f64; 3] = [0.0, 0.5, 1.0];

    /// Values on a threshold (1/3 or 2/3) map to the upper output.
    pub fn scale(&self, ratio: f64) -> f64 {
        let n = Self::OUTPUTS.len();
        let i = ((ratio.clamp(0.0, 1.0) * n as f64).floor() as usize).min(n - 1);
        Self::OUTPUTS[i]
    }

    /// Departure share of a station's traffic, `None` when it had none.
    pub fn departure_mix(&self, station: &Station) -> Option<f64> {
        if station.total_traffic == 0 {
            return None;
        }
        Some(self.scale(station.departures as f64 / station.total_traffic as f64))
    }
}

/// What a renderer needs to draw one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
    pub departure_mix: Option<f64>,
    pub title: String,
}

/// Tooltip text for a station.
pub fn title(station: &Station) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        station.total_traffic, station.departures, station.arrivals
    )
}

/// Builds one marker per station, in station order.
pub fn build_markers(stations: &[Station]) -> Vec<Marker> {
    let radius = SqrtScale::radius(stations);
    let flow = FlowScale;

    stations
        .iter()
        .map(|s| Marker {
            id: s.id.clone(),
            lon: s.lon,
            lat: s.lat,
            radius: radius.scale(s.total_traffic as f64),
            departure_mix: flow.departure_mix(s),
            title: title(s),
        })
        .collect()
}
