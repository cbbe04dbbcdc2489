//! Unicorn analysis report binary
//!
//! Runs the full analysis over a companies CSV, prints the tables and writes
//! chart figures plus `report.json`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin unicorn-report -- --input Unicorn_Companies.csv --output report
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use unicorn_analysis::config::AnalysisConfig;
use unicorn_analysis::error::ConfigError;
use unicorn_analysis::preprocessing::{AnalysisPipeline, AnalysisReport};
use unicorn_analysis::reporting::tables;

/// Valuation analysis of unicorn companies
#[derive(Parser, Debug)]
#[command(name = "unicorn-report")]
#[command(about = "Missing-data comparison and investor queries over a unicorn companies table")]
struct Args {
    /// Configuration file (defaults to analysis.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV, overrides `input.path`
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory, overrides `output.dir`
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => match AnalysisConfig::from_default_location() {
            Ok(config) => config,
            Err(ConfigError::NotFound) => {
                info!("No analysis.toml found, using defaults");
                AnalysisConfig::default()
            }
            Err(e) => return Err(e).context("Failed to load analysis.toml"),
        },
    };

    if let Some(input) = &args.input {
        config.input.path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output.dir = output.clone();
    }
    Ok(config)
}

fn print_report(report: &AnalysisReport, config: &AnalysisConfig) {
    println!("== Overview ==");
    println!("{}", tables::overview_table(&report.overview));
    for warning in &report.validation.warnings {
        println!("warning: {}", warning);
    }

    println!("\n== Missing values ==");
    println!("{}", tables::missing_counts_table(&report.missing.counts));
    println!("{}", tables::retention_table(&report.missing));
    println!("Backfilled cells:");
    println!("{}", tables::imputation_review_table(&report.missing));

    if let Some(sensitivity) = &report.sensitivity {
        println!(
            "\n== Missing values, counting {:?} as missing ==",
            sensitivity.sentinels.literals()
        );
        println!("{}", tables::missing_counts_table(&sensitivity.counts));
        println!("{}", tables::retention_table(sensitivity));
    }

    println!("\n== Companies matching the investor shortlist ==");
    if let Some(error) = &report.criteria_error {
        println!("criteria ignored: {}", error);
    }
    let matches: Vec<_> = report.criteria_matches.iter().collect();
    println!("{}", tables::criteria_matches_table(&matches));

    println!("\n== Valuation by country (first {}) ==", config.queries.preview_rows);
    println!(
        "{}",
        tables::country_totals_table(report.country_sums.head(config.queries.preview_rows))
    );
    if let Some(stats) = &report.box_plot {
        println!("{}", tables::box_plot_table(stats));
    }

    println!(
        "\n== Top {} countries excluding {} ==",
        config.queries.top_n,
        report.excluded_countries.join(", ")
    );
    println!("{}", tables::country_totals_table(&report.top_countries));

    println!("\n== Countries with companies joining after {} ==", report.min_year_joined);
    println!("{}", tables::country_totals_table(report.recent_joiners.entries()));
}

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!("Analyzing {}", config.input.path.display());

    let pipeline = AnalysisPipeline::with_config(config);
    let report = pipeline
        .run()
        .with_context(|| format!("Analysis of {} failed", pipeline.config().input.path.display()))?;

    print_report(&report, pipeline.config());

    let written = report
        .write_outputs(&pipeline.config().output)
        .context("Failed to write outputs")?;
    for path in written {
        println!("wrote {}", path.display());
    }
    info!("Input checksum {}", report.checksum);
    Ok(())
}
