//! Per-station traffic over a time-of-day window.

use std::collections::HashMap;

use crate::buckets::TripBuckets;
use crate::stations::Station;
use crate::time::TimeFilter;
use crate::trips::Trip;

/// Counts `trips` grouped by `key`.
pub fn rollup<'a, I, F>(trips: I, key: F) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a Trip>,
    F: Fn(&'a Trip) -> &'a str,
{
    let mut counts = HashMap::new();
    for trip in trips {
        *counts.entry(key(trip)).or_insert(0) += 1;
    }
    counts
}

/// Sets arrivals, departures and total traffic on every station for the
/// trips selected by `filter`.
///
/// A station whose id appears in no selected trip gets zero for that count.
/// Trips naming an unknown (or empty) station id count toward no station.
/// The result depends only on the arguments, so repeated calls agree.
pub fn compute_station_traffic(
    mut stations: Vec<Station>,
    buckets: &TripBuckets,
    filter: TimeFilter,
) -> Vec<Station> {
    let departures = rollup(buckets.departures_by_minute.iter_window(filter), |t| {
        t.start_station_id.as_str()
    });
    let arrivals = rollup(buckets.arrivals_by_minute.iter_window(filter), |t| {
        t.end_station_id.as_str()
    });

    for station in &mut stations {
        station.arrivals = arrivals.get(station.id.as_str()).copied().unwrap_or(0);
        station.departures = departures.get(station.id.as_str()).copied().unwrap_or(0);
        station.total_traffic = station.arrivals + station.departures;
    }

    stations
}

/// Totals over a set of stations, used for logging and sweep output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrafficSummary {
    pub stations: usize,
    pub active_stations: usize,
    pub arrivals: usize,
    pub departures: usize,
    pub busiest: Option<(String, usize)>,
}

impl TrafficSummary {
    pub fn from_stations(stations: &[Station]) -> Self {
        let mut s = TrafficSummary {
            stations: stations.len(),
            ..Default::default()
        };

        for station in stations {
            s.arrivals += station.arrivals;
            s.departures += station.departures;

            if station.total_traffic > 0 {
                s.active_stations += 1;
            }

            let busier = match &s.busiest {
                Some((_, best)) => station.total_traffic > *best,
                None => station.total_traffic > 0,
            };
            if busier {
                s.busiest = Some((station.id.clone(), station.total_traffic));
            }
        }

        s
    }
}
