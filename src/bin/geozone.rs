use clap::{Parser, ValueEnum};
use geozone::compute::geojson::grid_to_geojson;
use geozone::report::plot::render_svg;
use geozone::{
    Aggregator, Config, DensityAttributeChart, RecordPolicy, ZoneGrid, records_from_path,
};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    Skip,
    Abort,
}

impl From<Policy> for RecordPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Skip => RecordPolicy::Skip,
            Policy::Abort => RecordPolicy::Abort,
        }
    }
}

/// Aggregate geolocated records into grid zones and report per-zone statistics.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON array of flat objects with `longitude` and `latitude` fields
    input: PathBuf,

    /// Attribute averaged per zone
    #[arg(short, long, default_value = "agreeableness")]
    attribute: String,

    /// Grid configuration file (JSON, or TOML with the `toml` feature)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zone width in degrees, overrides the config file
    #[arg(long)]
    width: Option<f64>,

    /// Zone height in degrees, overrides the config file
    #[arg(long)]
    height: Option<f64>,

    /// What to do with records that cannot be placed
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Write a density/attribute scatter plot to this SVG file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write zone statistics as a GeoJSON FeatureCollection
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Keep empty zones in the GeoJSON output
    #[arg(long, default_value_t = false)]
    include_empty: bool,

    /// Log at debug level
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(config.grid.width_degrees);
        let height = args.height.unwrap_or(config.grid.height_degrees);
        config.grid = config.grid.with_resolution(width, height);
    }
    if let Some(policy) = args.policy {
        config.ingest = config.ingest.with_policy(policy.into());
    }

    let grid = ZoneGrid::new(config.grid)?;
    log::info!(
        "Grid of {} x {} zones",
        grid.longitude_bins(),
        grid.latitude_bins()
    );

    let outcomes = records_from_path(&args.input)?;
    let mut aggregator = Aggregator::new(&grid, config.ingest);
    let stats = aggregator.ingest_outcomes(outcomes)?;

    println!("records received: {}", stats.received);
    println!("records ingested: {}", stats.ingested);
    println!("records skipped:  {}", stats.skipped);
    println!("occupied zones:   {}", stats.occupied_zones);

    if let Some(path) = &args.plot {
        let chart = DensityAttributeChart::new(args.attribute.as_str());
        render_svg(&chart, &grid, path)?;
    }

    if let Some(path) = &args.geojson {
        let json = grid_to_geojson(&grid, Some(&args.attribute), args.include_empty)?;
        std::fs::write(path, json)?;
        log::info!("Wrote GeoJSON to {}", path.display());
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;

    #[cfg(feature = "toml")]
    if path.extension().is_some_and(|ext| ext == "toml") {
        return Ok(Config::from_toml(&text)?);
    }

    Ok(Config::from_json(&text)?)
}
