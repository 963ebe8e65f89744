//! Country Pandemic-Readiness CLI
//!
//! Scores countries, maps them to ISO codes, renders the world map and
//! exports the ranking. Every flag defaults to the fixed run layout.
//!
//! Usage:
//!   country-profiling --data Data/world_data_10-05-2020.json \
//!                     --weights Data/world_data_10-05-2020--list_country_properties.json

use anyhow::Result;
use clap::Parser;
use country_profiling::config::{self, ProfilingConfig};
use country_profiling::{
    pipeline, ChartRenderer, ExportFormat, IsoCountryDatabase, MissingPropertyPolicy,
    PlotlyHtmlRenderer,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "country-profiling",
    about = "Rank countries by pandemic readiness and map the result"
)]
struct Args {
    /// Country attribute JSON
    #[arg(short, long, default_value = config::DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Property weights JSON
    #[arg(short, long, default_value = config::DEFAULT_WEIGHTS_PATH)]
    weights: PathBuf,

    /// Output path without extension (defaults to a timestamped name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do when a country lacks a weighted property: truncate | skip
    #[arg(long, default_value = "truncate")]
    missing: MissingPropertyPolicy,

    /// Export formats (csv, excel); repeat for several
    #[arg(short, long = "format", default_values = ["csv", "excel"])]
    formats: Vec<ExportFormat>,

    /// Choropleth HTML page (defaults to the system temp directory)
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Skip the choropleth
    #[arg(long)]
    no_chart: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("{}", "=".repeat(60));
    info!("Country Pandemic-Readiness Profiling");
    info!("{}", "=".repeat(60));

    // The only wall-clock read of a run
    let stamp = config::run_stamp(&chrono::Local::now());
    let mut config = ProfilingConfig::with_stamp(&stamp);
    config.data_path = args.data;
    config.weights_path = args.weights;
    config.missing_policy = args.missing;
    config.formats = args.formats;
    if let Some(output) = args.output {
        config.output_base = output;
    }
    if args.no_chart {
        config.chart_path = None;
    } else if let Some(chart) = args.chart {
        config.chart_path = Some(chart);
    }

    let renderer = config.chart_path.clone().map(PlotlyHtmlRenderer::new);
    let outcome = pipeline::run(
        &config,
        IsoCountryDatabase::with_defaults(),
        renderer.as_ref().map(|r| r as &dyn ChartRenderer),
    )?;

    // Summary
    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Countries scored: {}", outcome.report.ranked.len());
    info!("Diagnostics: {}", outcome.report.diagnostics.len());
    if let Some(enriched) = &outcome.enriched {
        info!("Unresolved ISO codes: {}", enriched.unresolved().count());
    } else {
        warn!("Score table empty, map and exports skipped");
    }
    for path in &outcome.exported {
        info!("  wrote {:?}", path);
    }

    Ok(())
}
