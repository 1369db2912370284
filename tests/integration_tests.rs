use bike_traffic::config::Sources;
use bike_traffic::controller::TrafficMap;
use bike_traffic::fetch::BasicClient;
use bike_traffic::markers::SqrtScale;
use bike_traffic::stations::{Station, parse_stations};
use bike_traffic::time::TimeFilter;
use bike_traffic::trips::parse_trips;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn find<'a>(stations: &'a [Station], id: &str) -> &'a Station {
    stations.iter().find(|s| s.id == id).expect("station in fixture")
}

#[test]
fn test_full_pipeline() {
    let stations = parse_stations(include_bytes!("fixtures/stations.json")).expect("stations");
    let load = parse_trips(include_bytes!("fixtures/trips.csv")).expect("trips");
    assert_eq!(load.skipped, 1);
    assert_eq!(load.buckets.trip_count(), 6);

    let map = TrafficMap::new(stations, load.buckets);
    let all = map.stations();

    let kendall = find(all, "A32000");
    assert_eq!((kendall.departures, kendall.arrivals), (2, 2));
    let mit = find(all, "M32006");
    assert_eq!((mit.departures, mit.arrivals), (1, 2));
    let bpl = find(all, "D32016");
    assert_eq!((bpl.departures, bpl.arrivals), (2, 2));
    let quiet = find(all, "B32099");
    assert_eq!(quiet.total_traffic, 0);
}

#[test]
fn test_midnight_window_wraps() {
    let stations = parse_stations(include_bytes!("fixtures/stations.json")).unwrap();
    let load = parse_trips(include_bytes!("fixtures/trips.csv")).unwrap();
    let mut map = TrafficMap::new(stations, load.buckets);

    // 00:00 selects 23:00-23:59 and 00:00-00:59
    let stations = map.set_time_filter("00:00".parse().unwrap());
    let kendall = find(stations, "A32000");
    assert_eq!((kendall.departures, kendall.arrivals), (1, 0));
    let bpl = find(stations, "D32016");
    assert_eq!((bpl.departures, bpl.arrivals), (1, 1));
    let mit = find(stations, "M32006");
    assert_eq!((mit.departures, mit.arrivals), (0, 1));

    // 08:15 selects 07:15-09:14
    let stations = map.set_time_filter("08:15".parse().unwrap());
    let kendall = find(stations, "A32000");
    assert_eq!((kendall.departures, kendall.arrivals), (1, 1));
    assert_eq!(find(stations, "D32016").total_traffic, 0);
}

#[test]
fn test_idle_window_falls_back_to_unit_domain() {
    let stations = parse_stations(include_bytes!("fixtures/stations.json")).unwrap();
    let load = parse_trips(include_bytes!("fixtures/trips.csv")).unwrap();
    let mut map = TrafficMap::new(stations, load.buckets);

    let stations = map.set_time_filter(TimeFilter::from_slider(240).unwrap());
    assert!(stations.iter().all(|s| s.total_traffic == 0));
    assert_eq!(SqrtScale::radius(stations).domain(), [0.0, 1.0]);
    assert!(map.markers().iter().all(|m| m.radius == 0.0));
}

#[tokio::test]
async fn test_load_from_local_sources() {
    let sources = Sources::default()
        .with_overrides(Some(fixture("stations.json")), Some(fixture("trips.csv")));
    let client = BasicClient::new().unwrap();

    let map = TrafficMap::load(&client, &sources).await.expect("load map");
    assert_eq!(map.stations().len(), 4);
    assert_eq!(map.skipped_trips(), 1);
    assert_eq!(map.filter(), TimeFilter::Any);
    assert_eq!(find(map.stations(), "A32000").total_traffic, 4);
}

#[tokio::test]
async fn test_load_fails_on_missing_source() {
    let sources = Sources::default().with_overrides(
        Some(fixture("stations.json")),
        Some(fixture("does_not_exist.csv")),
    );
    let client = BasicClient::new().unwrap();

    assert!(TrafficMap::load(&client, &sources).await.is_err());
}
