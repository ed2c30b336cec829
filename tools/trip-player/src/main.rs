use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use city_replay_core::{
    collect_trips_in_range, trips_for_building, AnimationContext, Playback, ReplayConfig, Trip,
    TripScheduler,
};
use city_replay_dataset::{
    load_waste_sites, stat_ranges, BuildingIdentifier, CategoryFilter, DataFetcher,
    DatasetProvider, StaticDataset, Timeline, SLIDER_MAX,
};
use futures_util::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod console;
mod fetch;

use console::ConsolePresentation;
use fetch::SourceFetcher;

#[derive(Parser, Debug)]
#[command(
    name = "trip-player",
    author,
    version,
    about = "Replay waste-collection trips from the command line",
    long_about = "Loads building records and waste-site GeoJSON, then replays trips as \
                  truck markers moving from each building to its waste site.\n\n\
                  Trips start one stagger interval apart; each takes the configured \
                  duration. Drawing is reported to the log instead of a map."
)]
struct Args {
    /// Buildings JSON (path or http(s) URL)
    #[arg(short, long)]
    buildings: String,

    /// Waste sites GeoJSON (path or http(s) URL)
    #[arg(short, long)]
    waste_sites: String,

    /// Replay configuration JSON; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Duration of one trip in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Delay between consecutive trip launches in milliseconds
    #[arg(long)]
    stagger_ms: Option<u64>,

    /// Interpolation steps per trip
    #[arg(long)]
    steps: Option<u32>,

    /// List the trips that would be replayed without animating them
    #[arg(long)]
    dry_run: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay every trip of one building
    Building { id: String },

    /// Replay all trips between two dates (YYYY-MM-DD, inclusive)
    Range { from: String, to: String },

    /// Show the trip timeline and the dates a slider selection covers
    Timeline {
        /// Left slider handle
        #[arg(long, default_value_t = 0)]
        from: u16,

        /// Right slider handle
        #[arg(long, default_value_t = SLIDER_MAX)]
        to: u16,
    },

    /// Summarize housing units of buildings matching any selected category
    Filter {
        #[arg(long)]
        residential: bool,
        #[arg(long)]
        commercial: bool,
        /// At least half of the units are retired
        #[arg(long)]
        retired: bool,
        /// Has disabled owners
        #[arg(long)]
        disabled: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .without_time()
        .init();

    let config = load_config(&args)?;
    let dataset = load_dataset(&args).await?;

    match &args.command {
        Command::Building { id } => {
            let id = BuildingIdentifier::new(id);
            if args.dry_run {
                let trips = trips_for_building(dataset.as_ref(), &id)?;
                list_trips(&trips);
                return Ok(());
            }

            let scheduler = scheduler(dataset, config);
            let playback = scheduler.play_for_building(&id);
            drive(&scheduler, playback).await
        }
        Command::Range { from, to } => {
            if args.dry_run {
                let trips = collect_trips_in_range(dataset.as_ref(), from, to)?;
                list_trips(&trips);
                return Ok(());
            }

            let scheduler = scheduler(dataset, config);
            let playback = scheduler.play_for_range(from, to);
            drive(&scheduler, playback).await
        }
        Command::Timeline { from, to } => show_timeline(dataset.as_ref(), *from, *to),
        Command::Filter {
            residential,
            commercial,
            retired,
            disabled,
        } => {
            let filter = CategoryFilter {
                residential: *residential,
                commercial: *commercial,
                retired: *retired,
                disabled: *disabled,
            };
            show_filter(dataset.as_ref(), &filter);
            Ok(())
        }
    }
}

fn load_config(args: &Args) -> Result<ReplayConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ReplayConfig::from_json(&text).context("Invalid replay config")?
        }
        None => ReplayConfig::default(),
    };

    if let Some(ms) = args.duration_ms {
        config.trip_duration_ms = ms;
    }
    if let Some(ms) = args.stagger_ms {
        config.stagger_ms = ms;
    }
    if let Some(steps) = args.steps {
        config.steps = steps;
    }

    config.validate().context("Invalid replay config")?;
    Ok(config)
}

async fn load_dataset(args: &Args) -> Result<Arc<StaticDataset>> {
    let fetcher = SourceFetcher::new();

    info!("Buildings: {}", args.buildings);
    let bytes = fetcher
        .fetch(&args.buildings)
        .await
        .context("Failed to load buildings")?;
    let text = String::from_utf8(bytes).context("Buildings file is not UTF-8")?;
    let dataset = Arc::new(StaticDataset::from_buildings_json(&text).context("Failed to parse buildings")?);
    info!("  Loaded {} buildings", dataset.all_buildings().len());

    // Buildings stay usable without waste sites; trip lookups will report the gap
    info!("Waste sites: {}", args.waste_sites);
    if let Ok(count) = load_waste_sites(&fetcher, &args.waste_sites, &dataset).await {
        info!("  Loaded {count} waste sites");
    }

    Ok(dataset)
}

fn scheduler(dataset: Arc<StaticDataset>, config: ReplayConfig) -> TripScheduler {
    let context = Arc::new(AnimationContext::new());
    context.attach(Arc::new(ConsolePresentation::default()));
    TripScheduler::new(dataset, context, config)
}

/// Log progress until the batch ends. Ctrl-C cancels the batch.
async fn drive(scheduler: &TripScheduler, playback: Playback) -> Result<()> {
    let Playback { id, mut progress } = playback;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut interrupted = false;
    let mut failure = None;

    loop {
        tokio::select! {
            event = progress.next() => match event {
                Some(event) if event.is_failure() => {
                    error!("{event}");
                    failure = Some(event.to_string());
                }
                Some(event) => info!("{event}"),
                None => break,
            },
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                warn!("Interrupted, stopping {id}");
                scheduler.cancel(id);
            }
        }
    }

    if let Some(message) = failure {
        bail!(message);
    }
    Ok(())
}

fn list_trips(trips: &[Trip]) {
    if trips.is_empty() {
        println!("No trips.");
        return;
    }
    for (i, trip) in trips.iter().enumerate() {
        println!("{:>4}  {}", i + 1, trip.label());
    }
}

fn show_timeline(dataset: &dyn DatasetProvider, from: u16, to: u16) -> Result<()> {
    let buildings = dataset.all_buildings();
    let Some(timeline) = Timeline::from_buildings(buildings.iter().map(|b| b.as_ref())) else {
        bail!("No trip dates in the dataset");
    };

    println!(
        "Timeline: {} .. {} ({} days, {} trip dates)",
        timeline.min,
        timeline.max,
        timeline.span_days(),
        timeline.dates.len()
    );

    let range = timeline.selection(from, to);
    let trips = collect_trips_in_range(dataset, &range.from.to_string(), &range.to.to_string())?;
    println!(
        "Selection {}..{}: {} .. {} ({} trips)",
        from.min(to),
        from.max(to),
        range.from,
        range.to,
        trips.len()
    );
    Ok(())
}

fn show_filter(dataset: &dyn DatasetProvider, filter: &CategoryFilter) {
    let buildings = dataset.all_buildings();

    for (field, range) in stat_ranges(&buildings) {
        println!("{field:>18}: {} .. {}", range.min, range.max);
    }

    if filter.is_empty() {
        println!("No category selected.");
        return;
    }

    let summary = filter.summarize(&buildings);
    println!(
        "Selected units: {}, other units: {}",
        summary.selected_units, summary.other_units
    );
    for building in &summary.selected {
        println!("  {} {} ({} units)", building.id, building.name, building.units);
    }
}
