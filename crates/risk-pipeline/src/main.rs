//! Location Assessment CLI
//!
//! Runs the full risk pipeline for one location and prints the current
//! assessment plus an N-day forecast.
//!
//! Usage:
//!   assess-location --lat 27.7172 --lon 85.3240
//!   assess-location --city "Miami" --horizon 14 --output report.json

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Parser;
use geo_context::{GeoAtlas, Location};
use hazard_models::ModelRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use risk_pipeline::{cities, AssessmentReport, ForecastSeries, RiskPipeline, DEFAULT_HORIZON_DAYS};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "assess-location",
    about = "Multi-hazard risk assessment for a coordinate pair"
)]
struct Args {
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Preset city name instead of coordinates (e.g. "Kathmandu")
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Directory holding the per-hazard model artifacts
    #[arg(short, long, default_value = "data/models")]
    models_dir: PathBuf,

    /// Optional geo atlas JSON overriding the built-in region tables
    #[arg(long)]
    atlas: Option<PathBuf>,

    /// Forecast horizon in days
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon: u32,

    /// RNG seed for reproducible feature estimation
    #[arg(long)]
    seed: Option<u64>,

    /// Write the full report as pretty-printed JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Assessment plus forecast, the JSON output payload.
#[derive(Debug, Serialize)]
struct FullReport {
    assessment: AssessmentReport,
    forecast: ForecastSeries,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let location = resolve_location(&args)?;

    info!("{}", "=".repeat(60));
    info!("TerraWatch Location Assessment");
    info!("{}", "=".repeat(60));

    // Startup state: atlas and registry are built once and borrowed
    // read-only by the pipeline.
    let atlas = match &args.atlas {
        Some(path) => GeoAtlas::from_json_file(path)?,
        None => GeoAtlas::with_defaults(),
    };
    let registry = ModelRegistry::load(&args.models_dir)?;
    let pipeline = RiskPipeline::new(&atlas, &registry);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let now = Utc::now();
    let assessment = pipeline.assess(&location, now, &mut rng)?;

    let context = &assessment.context;
    info!("Location {}", location);
    info!(
        "  {} | {} | {}",
        if context.is_coastal { "Coastal" } else { "Inland/Landlocked" },
        context.forest_band.description(),
        context.seismic_zone
    );

    info!("\nCurrent assessment:");
    for estimate in &assessment.estimates {
        info!(
            "  {:12} | raw {:.3} | calibrated {:.3} | {}",
            estimate.hazard.label(),
            estimate.raw_probability,
            estimate.calibrated_probability,
            estimate.risk_level().description()
        );
    }

    let forecast = pipeline.forecast(&location, now, args.horizon, &mut rng)?;

    info!("\n{}-day forecast:", forecast.horizon_days);
    for day in &forecast.days {
        let risks: Vec<String> = day
            .estimates
            .iter()
            .map(|e| format!("{} {:.0}%", e.hazard, e.calibrated_probability * 100.0))
            .collect();
        info!(
            "  {} | {} | max {:.1}% ({})",
            day.date,
            risks.join(", "),
            day.max_calibrated * 100.0,
            day.risk_level.description()
        );
    }

    let high_risk: Vec<_> = forecast.high_risk_days().collect();
    if !high_risk.is_empty() {
        warn!(
            "{} high-risk date(s) in the next {} days:",
            high_risk.len(),
            forecast.horizon_days
        );
        for day in high_risk {
            warn!("  {} - max risk {:.1}%", day.date, day.max_calibrated * 100.0);
        }
    }

    if let Some(path) = &args.output {
        info!("\nWriting report to {:?}", path);
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &FullReport { assessment, forecast })?;
    }

    Ok(())
}

fn resolve_location(args: &Args) -> Result<Location> {
    if let Some(name) = &args.city {
        return match cities::lookup(name) {
            Some(location) => Ok(location),
            None => bail!("unknown city preset: {name}"),
        };
    }

    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Ok(Location::new(lat, lon)?),
        _ => bail!("provide either --city or both --lat and --lon"),
    }
}
