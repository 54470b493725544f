//! # Politics Scraper
//!
//! Scrapes the politics section of eight US news outlets and keeps one
//! de-duplicated CSV dataset per outlet.
//!
//! ## Usage
//!
//! ```sh
//! politics_scraper init
//! politics_scraper scrape -o nyt -o ap
//! ```
//!
//! ## Architecture
//!
//! Each outlet runs start to finish on its own, one after the other:
//! 1. **Indexing**: fetch the section page and collect article links
//! 2. **Fetching**: fetch every article and extract title, date and body
//! 3. **Ingesting**: merge the complete batch into `<data_dir>/<outlet>_data.csv`
//!
//! A failure in one outlet is reported and does not stop the others.

use clap::Parser;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod http;
mod ingest;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::{Cli, Command};
use config::Config;
use error::{IngestError, ScrapeError};
use http::FetchPage;
use ingest::Ingestor;
use models::{ArticleRecord, IngestReport};
use scrapers::Outlet;
use utils::{ensure_writable_dir, truncate_for_log};

/// What happened to one outlet during a `scrape` run.
#[derive(Debug)]
enum OutletOutcome {
    Ingested(IngestReport),
    ScrapeFailed(ScrapeError),
    IngestFailed(IngestError),
    Interrupted,
}

impl OutletOutcome {
    fn is_failure(&self) -> bool {
        !matches!(self, OutletOutcome::Ingested(_))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(data_dir = %args.data_dir.display(), config = ?args.config, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref()).await?;

    match args.command {
        Command::Rules { outlets } => print_rules(&config, &outlets.resolve())?,
        Command::Init { outlets } => {
            init_datasets(&args.data_dir, &config, &outlets.resolve()).await?;
        }
        Command::Scrape { outlets, dedup } => {
            let dedup = dedup.unwrap_or(config.dedup);
            let outcomes = run_scrape(&args.data_dir, &config, dedup, &outlets.resolve()).await?;
            print_summary(&outcomes);

            let failed = outcomes.values().filter(|o| o.is_failure()).count();
            let elapsed = start_time.elapsed();
            info!(?elapsed, outlets = outcomes.len(), failed, "Execution complete");
            if failed > 0 {
                return Err(format!("{failed} of {} outlets failed", outcomes.len()).into());
            }
        }
    }
    Ok(())
}

/// Print the rules in effect for `outlets` as a YAML map keyed by outlet id.
fn print_rules(config: &Config, outlets: &[Outlet]) -> Result<(), Box<dyn Error>> {
    let rules: BTreeMap<&str, _> = outlets
        .iter()
        .map(|&o| (o.id(), config.rules_for(o)))
        .collect();
    print!("{}", serde_yaml::to_string(&rules)?);
    Ok(())
}

#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
async fn init_datasets(data_dir: &Path, config: &Config, outlets: &[Outlet]) -> Result<(), Box<dyn Error>> {
    ensure_writable_dir(data_dir).await?;
    let ingestor = Ingestor::new(data_dir, config.dedup);
    for &outlet in outlets {
        let path = ingestor.dataset_path(outlet.id());
        if ingestor.provision(outlet.id()).await? {
            println!("created {}", path.display());
        } else {
            println!("exists  {}", path.display());
        }
    }
    Ok(())
}

/// Scrape every outlet with Ctrl-C as the cancel signal.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display(), %dedup))]
async fn run_scrape(
    data_dir: &Path,
    config: &Config,
    dedup: models::DedupKey,
    outlets: &[Outlet],
) -> Result<BTreeMap<Outlet, OutletOutcome>, Box<dyn Error>> {
    ensure_writable_dir(data_dir).await?;
    let ingestor = Ingestor::new(data_dir, dedup);
    let fetcher = http::build_fetcher(&config.http)?;
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C; run is not interruptible");
            std::future::pending::<()>().await;
        }
    };
    Ok(scrape_all(&fetcher, &ingestor, config, outlets, ctrl_c).await)
}

/// Scrape and ingest each outlet in turn.
///
/// `cancel` only races the scrape. A batch that is complete is always handed
/// to the ingestor and reported; an outlet cancelled mid-scrape persists
/// nothing and stops the run.
async fn scrape_all<F, C>(
    fetcher: &F,
    ingestor: &Ingestor,
    config: &Config,
    outlets: &[Outlet],
    cancel: C,
) -> BTreeMap<Outlet, OutletOutcome>
where
    F: FetchPage,
    C: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let mut outcomes = BTreeMap::new();
    for &outlet in outlets {
        let rules = config.rules_for(outlet);
        let scraped = tokio::select! {
            batch = scrapers::scrape_outlet(fetcher, &rules) => Some(batch),
            () = &mut cancel => None,
        };

        let outcome = match scraped {
            Some(Ok(batch)) => ingest_batch(ingestor, outlet, batch).await,
            Some(Err(e)) => {
                error!(%outlet, error = %e, "Scrape failed; dataset left untouched");
                OutletOutcome::ScrapeFailed(e)
            }
            None => {
                warn!(%outlet, "Interrupted; batch discarded and remaining outlets skipped");
                outcomes.insert(outlet, OutletOutcome::Interrupted);
                break;
            }
        };
        outcomes.insert(outlet, outcome);
    }
    outcomes
}

/// Hand one outlet's complete batch to the ingestor.
#[instrument(level = "info", skip_all, fields(%outlet, count = batch.len()))]
async fn ingest_batch(ingestor: &Ingestor, outlet: Outlet, batch: Vec<ArticleRecord>) -> OutletOutcome {
    if let Some(first) = batch.first() {
        debug!(title = %first.title, body = %truncate_for_log(&first.body_text, 120), "First record");
    }

    match ingestor.merge_and_persist(outlet.id(), batch).await {
        Ok(report) => {
            println!("{report}");
            OutletOutcome::Ingested(report)
        }
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            OutletOutcome::IngestFailed(e)
        }
    }
}

fn print_summary(outcomes: &BTreeMap<Outlet, OutletOutcome>) {
    println!();
    println!("{:<10} {:>8} {:>8} {:>8}  status", "outlet", "old", "new", "delta");
    for (outlet, outcome) in outcomes {
        match outcome {
            OutletOutcome::Ingested(r) => println!(
                "{:<10} {:>8} {:>8} {:>+8}  ok ({} scraped, {})",
                outlet.id(),
                r.old_count,
                r.new_count,
                r.delta(),
                r.batch_len,
                r.ran_at.format("%Y-%m-%d %H:%M:%S")
            ),
            OutletOutcome::ScrapeFailed(e) => {
                println!("{:<10} {:>8} {:>8} {:>8}  scrape failed: {e}", outlet.id(), "-", "-", "-")
            }
            OutletOutcome::IngestFailed(e) => {
                println!("{:<10} {:>8} {:>8} {:>8}  ingest failed: {e}", outlet.id(), "-", "-", "-")
            }
            OutletOutcome::Interrupted => {
                println!("{:<10} {:>8} {:>8} {:>8}  interrupted", outlet.id(), "-", "-", "-")
            }
        }
    }
}
