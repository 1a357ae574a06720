//! eurofx CLI - serve or query ECB exchange rates
//!
//! Loads the full rate history once, then either serves the HTTP API or runs
//! a single query and prints the result as JSON.
//!
//! ## Example Usage
//!
//! ```bash
//! # Serve the HTTP API
//! eurofx serve --bind 0.0.0.0:8080
//!
//! # Convert 100 USD to JPY on a given date
//! eurofx convert --date 2023-05-30 --from USD --to JPY --amount 100
//!
//! # Highest USD rate over a range, from a local copy of the history
//! eurofx --source ./eurofxref-hist.zip highest --start 2023-05-01 --end 2023-05-31 --currency USD
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use eurofx::config::Config;
use eurofx::error::RatesError;
use eurofx::ingest::{AutoDetectParser, ExchangeRateProvider, SourceDownloader};
use eurofx::rates::{QueryEngine, RateTable};
use rust_decimal::Decimal;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

/// eurofx: European Central Bank reference rates
#[derive(Parser)]
#[command(name = "eurofx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and serve ECB daily exchange rates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rate source, URL or path to a ZIP/CSV file (overrides the config file)
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on (default from config: 127.0.0.1:8080)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Show all rates for a date
    Rates {
        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
    },

    /// Convert an amount between two currencies
    Convert {
        /// Date of the rates to use (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Currency to convert from
        #[arg(long)]
        from: String,

        /// Currency to convert to
        #[arg(long)]
        to: String,

        /// Amount to convert
        #[arg(short, long)]
        amount: Decimal,
    },

    /// Highest rate of a currency over a date range
    Highest {
        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,

        /// End date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: NaiveDate,

        /// Currency code
        #[arg(long)]
        currency: String,
    },

    /// Average rate of a currency over a date range
    Average {
        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,

        /// End date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: NaiveDate,

        /// Currency code
        #[arg(long)]
        currency: String,
    },

    /// Show what was loaded
    Info,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.source = source;
    }

    if cli.verbose {
        println!("{} v{}", "eurofx".cyan().bold(), env!("CARGO_PKG_VERSION"));
        println!("Source: {}", config.source.dimmed());
    }

    let engine = load_engine(&config, cli.verbose)
        .await
        .context("failed to load exchange rates")?;

    match cli.command {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind_address);
            eurofx::server::serve(engine, addr).await?;
            Ok(())
        }
        Commands::Rates { date } => print_result(Ok(engine.rates_for_date(date))),
        Commands::Convert {
            date,
            from,
            to,
            amount,
        } => print_result(engine.convert_currency(date, &from, &to, amount)),
        Commands::Highest {
            start,
            end,
            currency,
        } => print_result(engine.highest_rate(start, end, &currency)),
        Commands::Average {
            start,
            end,
            currency,
        } => print_result(engine.average_rate(start, end, &currency)),
        Commands::Info => {
            show_info(engine.table());
            Ok(())
        }
    }
}

/// Download and parse the configured source
async fn load_engine(config: &Config, verbose: bool) -> Result<QueryEngine> {
    let started = Instant::now();

    let downloader = SourceDownloader::for_source(&config.source, config.timeout(), config.max_retries)?;
    let provider = ExchangeRateProvider::new(downloader, AutoDetectParser::new(), config.source.clone());
    let table = provider.load_rates().await?;

    if verbose {
        println!(
            "Loaded {} days in {:.2?}",
            table.len().to_string().green(),
            started.elapsed()
        );
    }

    Ok(QueryEngine::new(Arc::new(table)))
}

fn print_result<T: Serialize>(result: std::result::Result<Option<T>, RatesError>) -> Result<()> {
    match result? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        None => {
            println!("{}", "No data found for the given query.".yellow());
        }
    }
    Ok(())
}

fn show_info(table: &RateTable) {
    println!("{}", "Exchange rate table".cyan().bold());
    println!("  Days:       {}", table.len());
    if let (Some(first), Some(last)) = (table.first_date(), table.last_date()) {
        println!("  Range:      {} to {}", first, last);
    }

    let currencies: Vec<&str> = table.currencies().into_iter().collect();
    println!("  Currencies: {} ({})", currencies.len(), currencies.join(", ").dimmed());
}
