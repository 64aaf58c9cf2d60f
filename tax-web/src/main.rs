use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use tax_core::GamblingTaxEngine;
use tax_web::calc::CalcArgs;
use tax_web::config::{AppConfig, ConfigOverrides};
use tax_web::logging::{
    disable_file_logging, enable_file_logging, init_default_logging, set_log_level,
    set_stdout_enabled,
};
use tax_web::server;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Gambling winnings tax calculator.
///
/// Serves the calculator as a web form, or runs a single calculation from
/// the command line.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web calculator.
    Serve(ServeArgs),
    /// Calculate tax for one set of inputs and print it.
    Calc(CalcArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log filter, e.g. `debug` or `tax_web=trace,info`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Suppress log output on stdout.
    #[arg(long)]
    quiet: bool,
}

// ─── serve ───────────────────────────────────────────────────────────────────

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    config.apply_overrides(ConfigOverrides {
        host: args.host,
        port: args.port,
        log_level: args.log_level,
        log_file: args.log_file,
    });

    if let Some(level) = &config.logging.level {
        set_log_level(level)?;
    }
    if args.quiet {
        set_stdout_enabled(false)?;
    }
    if let Some(file) = &config.logging.file {
        enable_file_logging(file)?;
        info!(path = %file.display(), "file logging enabled");
    }

    debug!(?config, "effective configuration");
    let outcome = server::serve(&config.server).await;
    disable_file_logging();
    outcome
}

// ─── calc ────────────────────────────────────────────────────────────────────

fn run_calc(args: CalcArgs) -> anyhow::Result<()> {
    let result = args
        .calculate(&GamblingTaxEngine::default())
        .context("calculation failed")?;

    print!("{}", args.render(&result)?);
    if args.json {
        println!();
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_default_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_server(args).await,
        Command::Calc(args) => run_calc(args),
    }
}
