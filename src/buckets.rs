//! Minute-of-day trip buckets and circular window selection.

use std::sync::Arc;

use crate::time::{MINUTES_PER_DAY, MinuteOfDay, TimeFilter};
use crate::trips::Trip;

/// 1440 trip lists indexed by minute of day.
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    by_minute: Vec<Vec<Arc<Trip>>>,
}

impl Default for MinuteBuckets {
    fn default() -> Self {
        Self {
            by_minute: vec![Vec::new(); MINUTES_PER_DAY as usize],
        }
    }
}

impl MinuteBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `trip` to the bucket at `minute`.
    pub fn push(&mut self, minute: MinuteOfDay, trip: Arc<Trip>) {
        self.by_minute[minute.index()].push(trip);
    }

    pub fn bucket(&self, minute: MinuteOfDay) -> &[Arc<Trip>] {
        &self.by_minute[minute.index()]
    }

    /// Total trips across all buckets.
    pub fn len(&self) -> usize {
        self.by_minute.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_minute.iter().all(Vec::is_empty)
    }

    /// Trips selected by `filter`, in bucket order then insertion order.
    ///
    /// For [`TimeFilter::Any`] every bucket is returned. Otherwise buckets
    /// `[min, max)` of the ±60 minute window are returned, where a window
    /// crossing midnight yields `[min, 1440)` followed by `[0, max)`.
    pub fn filter_by_minute(&self, filter: TimeFilter) -> Vec<&Trip> {
        self.iter_window(filter).collect()
    }

    /// Lazy form of [`MinuteBuckets::filter_by_minute`].
    pub fn iter_window(&self, filter: TimeFilter) -> impl Iterator<Item = &Trip> + '_ {
        let ranges = match filter.window() {
            None => [0..MINUTES_PER_DAY as usize, 0..0],
            Some(window) => window.ranges(),
        };
        ranges
            .into_iter()
            .flat_map(move |range| self.by_minute[range].iter())
            .flatten()
            .map(|trip| &**trip)
    }
}

/// Departure and arrival buckets built once from the full trip set.
#[derive(Debug, Clone, Default)]
pub struct TripBuckets {
    pub departures_by_minute: MinuteBuckets,
    pub arrivals_by_minute: MinuteBuckets,
}

impl TripBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `trip` under its start minute and its end minute.
    pub fn insert(&mut self, trip: Trip) {
        let trip = Arc::new(trip);
        self.departures_by_minute
            .push(trip.started_minute(), Arc::clone(&trip));
        self.arrivals_by_minute.push(trip.ended_minute(), trip);
    }

    /// Number of trips loaded.
    pub fn trip_count(&self) -> usize {
        self.departures_by_minute.len()
    }
}

impl FromIterator<Trip> for TripBuckets {
    fn from_iter<I: IntoIterator<Item = Trip>>(iter: I) -> Self {
        let mut buckets = TripBuckets::new();
        for trip in iter {
            buckets.insert(trip);
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at_minute(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(m / 60, m % 60, 0)
            .unwrap()
    }

    fn trip(start: &str, end: &str, started: u32, ended: u32) -> Trip {
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: at_minute(started),
            ended_at: at_minute(ended),
        }
    }

    fn minute(m: u16) -> MinuteOfDay {
        MinuteOfDay::new(m).unwrap()
    }

    fn ids(trips: &[&Trip]) -> Vec<String> {
        trips.iter().map(|t| t.start_station_id.clone()).collect()
    }

    #[test]
    fn test_each_trip_lands_in_one_bucket_per_sequence() {
        let buckets: TripBuckets = vec![
            trip("A", "B", 485, 500),
            trip("B", "C", 485, 1439),
            trip("C", "A", 0, 15),
        ]
        .into_iter()
        .collect();

        assert_eq!(buckets.trip_count(), 3);
        assert_eq!(buckets.arrivals_by_minute.len(), 3);
        assert_eq!(buckets.departures_by_minute.bucket(minute(485)).len(), 2);
        assert_eq!(buckets.departures_by_minute.bucket(minute(0)).len(), 1);
        assert_eq!(buckets.arrivals_by_minute.bucket(minute(500)).len(), 1);
        assert_eq!(buckets.arrivals_by_minute.bucket(minute(1439)).len(), 1);
        assert_eq!(buckets.arrivals_by_minute.bucket(minute(15)).len(), 1);
    }

    #[test]
    fn test_unfiltered_returns_all_in_bucket_then_insertion_order() {
        let buckets: TripBuckets = vec![
            trip("late", "x", 1300, 1310),
            trip("early1", "x", 10, 20),
            trip("early2", "x", 10, 20),
            trip("mid", "x", 600, 610),
        ]
        .into_iter()
        .collect();

        let all = buckets.departures_by_minute.filter_by_minute(TimeFilter::Any);
        assert_eq!(all.len(), 4);
        assert_eq!(ids(&all), vec!["early1", "early2", "mid", "late"]);
    }

    #[test]
    fn test_wrapping_window_selection() {
        let buckets: TripBuckets = vec![
            trip("b1430", "x", 1430, 1430),
            trip("b50", "x", 50, 50),
            trip("b200", "x", 200, 200),
            trip("b89", "x", 89, 89),
            trip("b90", "x", 90, 90),
            trip("b1410", "x", 1410, 1410),
            trip("b1409", "x", 1409, 1409),
        ]
        .into_iter()
        .collect();

        let filter = TimeFilter::Around(minute(30));
        let selected = buckets.departures_by_minute.filter_by_minute(filter);
        assert_eq!(ids(&selected), vec!["b1410", "b1430", "b50", "b89"]);
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        let buckets: TripBuckets = vec![
            trip("lo", "x", 440, 440),
            trip("hi", "x", 560, 560),
            trip("last", "x", 559, 559),
        ]
        .into_iter()
        .collect();

        let selected = buckets
            .departures_by_minute
            .filter_by_minute(TimeFilter::Around(minute(500)));
        assert_eq!(ids(&selected), vec!["lo", "last"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let buckets: TripBuckets = (0..1440)
            .step_by(7)
            .map(|m| trip(&format!("s{m}"), "x", m, (m + 13) % 1440))
            .collect();

        for center in [0u16, 30, 59, 60, 500, 1380, 1439] {
            let filter = TimeFilter::Around(minute(center));
            let first = ids(&buckets.departures_by_minute.filter_by_minute(filter));
            let second = ids(&buckets.departures_by_minute.filter_by_minute(filter));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_empty_buckets() {
        let buckets = TripBuckets::new();
        assert!(buckets.departures_by_minute.is_empty());
        assert!(
            buckets
                .arrivals_by_minute
                .filter_by_minute(TimeFilter::Any)
                .is_empty()
        );
    }
}
