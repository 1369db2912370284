//! CLI entry point for the bike traffic tool.
//!
//! Provides subcommands for computing station traffic under a time filter,
//! sweeping the filter across the day, and summarizing the bike-lane layers.

use anyhow::{Result, bail};
use bike_traffic::{
    config::Sources,
    controller::TrafficMap,
    fetch::BasicClient,
    lanes::load_lane_layer,
    output::{append_traffic, print_json, print_pretty},
    time::{MINUTES_PER_DAY, MinuteOfDay, TimeFilter},
    traffic::TrafficSummary,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::Instrument;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_traffic")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    /// JSON file listing station, trip and lane sources
    #[arg(long, global = true)]
    sources: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute station traffic for one time filter
    Traffic {
        /// Station JSON file or URL
        #[arg(long)]
        stations: Option<String>,

        /// Trips CSV file or URL (may be .gz)
        #[arg(long)]
        trips: Option<String>,

        /// Time filter: "any", -1, a minute of day (0-1439) or HH:MM
        #[arg(short, long, default_value = "any", allow_hyphen_values = true)]
        time: String,

        /// Optional CSV file to append station traffic to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the station markers as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay slider positions across the day and export each window
    Sweep {
        /// Station JSON file or URL
        #[arg(long)]
        stations: Option<String>,

        /// Trips CSV file or URL (may be .gz)
        #[arg(long)]
        trips: Option<String>,

        /// Minutes between slider positions
        #[arg(short, long, default_value_t = 60)]
        step: u16,

        /// CSV file to append results to
        #[arg(short, long, default_value = "traffic_sweep.csv")]
        output: String,
    },
    /// Load the bike-lane layers and summarize their geometry
    Lanes {
        /// Maximum number of concurrent layer downloads
        #[arg(short, long, default_value_t = 2)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bike_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let base_sources = match &cli.sources {
        Some(path) => Sources::load(path)?,
        None => Sources::from_env(),
    };

    match cli.command {
        Commands::Traffic {
            stations,
            trips,
            time,
            output,
            json,
        } => {
            let filter: TimeFilter = time.parse()?;
            let sources = base_sources.with_overrides(stations, trips);
            let mut map = load_map(&sources).await?;

            map.set_time_filter(filter);
            let summary = TrafficSummary::from_stations(map.stations());
            let label = map
                .time_label()
                .unwrap_or_else(|| "(any time)".to_string());
            info!(
                filter = %filter,
                label = %label,
                stations = summary.stations,
                active_stations = summary.active_stations,
                arrivals = summary.arrivals,
                departures = summary.departures,
                busiest = ?summary.busiest,
                "Station traffic computed"
            );
            print_pretty(map.stations());

            if json {
                print_json(&map.markers())?;
            }
            if let Some(path) = output {
                append_traffic(&path, filter, map.stations())?;
                info!(path = %path, "Station traffic written");
            }
        }
        Commands::Sweep {
            stations,
            trips,
            step,
            output,
        } => {
            if step == 0 {
                bail!("--step must be at least 1 minute");
            }
            let sources = base_sources.with_overrides(stations, trips);
            let mut map = load_map(&sources).await?;
            sweep(&mut map, step, &output)?;
        }
        Commands::Lanes { concurrency } => {
            summarize_lanes(&base_sources, concurrency).await?;
        }
    }

    Ok(())
}

/// Loads the traffic map, logging the failure before halting.
async fn load_map(sources: &Sources) -> Result<TrafficMap> {
    let client = BasicClient::new()?;
    TrafficMap::load(&client, sources)
        .await
        .inspect_err(|e| error!(error = %format!("{e:#}"), "Failed to load traffic data"))
}

/// Feeds the unfiltered position and then every `step` minutes through the
/// map, appending each window's station traffic to `output`.
#[tracing::instrument(skip(map))]
fn sweep(map: &mut TrafficMap, step: u16, output: &str) -> Result<()> {
    let mut filters = vec![TimeFilter::Any];
    for minute in (0..MINUTES_PER_DAY).step_by(step as usize) {
        filters.push(TimeFilter::Around(MinuteOfDay::new(minute)?));
    }

    for filter in filters {
        let stations = map.set_time_filter(filter);
        let summary = TrafficSummary::from_stations(stations);
        append_traffic(output, filter, stations)?;

        match &summary.busiest {
            Some((id, total)) => info!(
                filter = %filter,
                departures = summary.departures,
                arrivals = summary.arrivals,
                busiest = %id,
                busiest_total = total,
                "Window computed"
            ),
            None => info!(filter = %filter, "Window has no traffic"),
        }
    }

    info!(output, "Sweep complete");
    Ok(())
}

/// Loads every configured lane layer concurrently and logs a summary.
#[tracing::instrument(skip(sources), fields(layers = sources.lanes.len()))]
async fn summarize_lanes(sources: &Sources, concurrency: usize) -> Result<()> {
    let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));
    let mut tasks = vec![];

    for layer in &sources.lanes {
        let sem = semaphore.clone();
        let layer = layer.clone();
        let layer_span = tracing::info_span!("lane_layer", layer = %layer.id);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire().await?;
                let client = BasicClient::new()?;
                let summary = load_lane_layer(&client, &layer).await?;
                anyhow::Ok(summary)
            }
            .instrument(layer_span),
        );
        tasks.push(task);
    }

    let mut failures = 0;
    for task in tasks {
        match task.await? {
            Ok(summary) => print_json(&summary)?,
            Err(e) => {
                error!(error = %format!("{e:#}"), "Failed to load lane layer");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} lane layer(s) failed to load", failures);
    }
    Ok(())
}
