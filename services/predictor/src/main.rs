//! One-shot drift prediction service.
//!
//! Opens a wind dataset, runs a single balloon flight (ascent to burst,
//! then density-scaled descent) through the trajectory integrator, and
//! writes the predicted track as CSV or JSON.

mod altitude;
mod sink;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trajectory::{run, IntegratorConfig, Launch};
use wind_grid::{Dataset, WindSampler};

use altitude::AscentProfile;
use sink::{CsvSink, JsonSink};

#[derive(Parser, Debug)]
#[command(name = "predictor")]
#[command(about = "Balloon drift prediction over a gridded wind dataset")]
struct Args {
    /// Path to the wind dataset file
    dataset: PathBuf,

    /// Timestamp of the dataset's first time slice (RFC 3339)
    #[arg(long)]
    dataset_start: DateTime<Utc>,

    /// Launch latitude, degrees north
    #[arg(long)]
    lat: f64,

    /// Launch longitude, degrees east
    #[arg(long)]
    lon: f64,

    /// Launch altitude, metres
    #[arg(long, default_value = "0")]
    alt: f64,

    /// Launch time (RFC 3339; default: dataset start)
    #[arg(long)]
    launch_time: Option<DateTime<Utc>>,

    /// Ascent rate, m/s
    #[arg(long, default_value = "5.0")]
    ascent_rate: f64,

    /// Burst altitude, metres
    #[arg(long, default_value = "30000")]
    burst_altitude: f64,

    /// Sea-level descent rate, m/s
    #[arg(long, default_value = "5.0")]
    descent_rate: f64,

    /// Integration timestep, seconds
    #[arg(long, default_value = "1.0")]
    timestep: f64,

    /// Emit one sample every N steps
    #[arg(long, default_value = "25")]
    decimation: u32,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Log filter directive
    #[arg(long, default_value = "info", env = "PREDICTOR_LOG")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).context("invalid log filter")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let dataset = Dataset::open(&args.dataset)
        .with_context(|| format!("opening dataset {}", args.dataset.display()))?;
    let mut sampler = WindSampler::new(dataset, args.dataset_start);

    let launch = Launch {
        latitude: args.lat,
        longitude: args.lon,
        altitude: args.alt,
        time: args.launch_time.unwrap_or(args.dataset_start),
    };
    let mut model = AscentProfile::new(
        args.alt,
        args.ascent_rate,
        args.burst_altitude,
        args.descent_rate,
    );
    let config = IntegratorConfig {
        timestep: args.timestep,
        decimation: args.decimation,
    };

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let report = match args.format {
        Format::Csv => {
            let mut sink = CsvSink::new(writer);
            let report = run(&mut sampler, &mut model, &mut sink, launch, &config);
            sink.finish().context("flushing trajectory output")?;
            report
        }
        Format::Json => {
            let mut sink = JsonSink::new();
            let report = run(&mut sampler, &mut model, &mut sink, launch, &config);
            sink.finish(writer).context("writing trajectory output")?;
            report
        }
    };

    info!(
        steps = report.steps,
        emitted = report.emitted,
        landing_lat = report.final_sample.latitude,
        landing_lon = report.final_sample.longitude,
        clamp_events = sampler.clamp_events(),
        "prediction complete"
    );

    if report.termination.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // The partial trajectory was still written; flag the degradation.
        info!(termination = ?report.termination, "prediction ended early");
        Ok(ExitCode::from(1))
    }
}
