use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tax_data::{BatchReport, QueryLoader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Compute gambling tax for every query in a CSV file.
///
/// The CSV file should have the following columns:
/// - tax_year: The tax year (e.g., 2026)
/// - winnings, losses: Gross amounts (optional)
/// - profit, roi_percent: Net result and ROI percentage (optional)
///
/// Each row needs either winnings and losses or profit and roi_percent.
#[derive(Parser, Debug)]
#[command(name = "gambling-tax-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the queries
    #[arg(short, long)]
    file: PathBuf,

    /// Where to write the result CSV (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with an error if any query was rejected
    #[arg(long, default_value_t = false)]
    strict: bool,
}

/// Logs go to stderr so the report can be piped from stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    info!("Reading queries from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = QueryLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    info!("Parsed {} queries from CSV", records.len());

    let report = BatchReport::evaluate(&records);

    match &args.output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            report
                .write_csv(BufWriter::new(out))
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!("Report written to: {}", path.display());
        }
        None => report
            .write_csv(io::stdout().lock())
            .context("Failed to write report to stdout")?,
    }

    let computed = report.rows().len() - report.failure_count();
    match report.total_tax_owed() {
        Some(total) => info!(
            computed,
            rejected = report.failure_count(),
            total_tax_owed = %total,
            "batch complete"
        ),
        None => warn!(
            computed,
            rejected = report.failure_count(),
            "batch complete; total tax owed is too large to represent"
        ),
    }

    if args.strict && report.failure_count() > 0 {
        bail!("{} of {} queries were rejected", report.failure_count(), report.rows().len());
    }

    Ok(())
}
