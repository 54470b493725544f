//! Command-line interface definitions.
//!
//! Global options can also be given through environment variables.

use crate::models::DedupKey;
use crate::scrapers::Outlet;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scrape politics articles from US news outlets into per-outlet CSV datasets.
///
/// # Examples
///
/// ```sh
/// # Create empty datasets once
/// politics_scraper init
///
/// # Scrape everything into ./data
/// politics_scraper scrape
///
/// # Two outlets, de-duplicating by link
/// politics_scraper --data-dir /srv/news scrape -o nyt -o fox --dedup link
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the `<outlet>_data.csv` files
    #[arg(short, long, env = "SCRAPER_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "SCRAPER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape outlets and merge the results into their datasets
    Scrape {
        #[command(flatten)]
        outlets: OutletSelection,

        /// Duplicate policy; overrides the config file
        #[arg(long, value_enum)]
        dedup: Option<DedupKey>,
    },
    /// Create empty datasets for outlets that have none
    Init {
        #[command(flatten)]
        outlets: OutletSelection,
    },
    /// Print the effective extraction rules as YAML
    Rules {
        #[command(flatten)]
        outlets: OutletSelection,
    },
}

#[derive(Args, Debug, Clone)]
pub struct OutletSelection {
    /// Outlet to process (repeatable); all outlets when omitted
    #[arg(short, long = "outlet", value_enum)]
    pub outlet: Vec<Outlet>,
}

impl OutletSelection {
    /// Selected outlets in canonical order, without repeats.
    pub fn resolve(&self) -> Vec<Outlet> {
        if self.outlet.is_empty() {
            return Outlet::ALL.to_vec();
        }
        let mut outlets = self.outlet.clone();
        outlets.sort();
        outlets.dedup();
        outlets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_defaults_to_all_outlets() {
        let cli = Cli::parse_from(["politics_scraper", "scrape"]);
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        match cli.command {
            Command::Scrape { outlets, dedup } => {
                assert_eq!(outlets.resolve(), Outlet::ALL.to_vec());
                assert_eq!(dedup, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_scrape_selected_outlets_and_dedup() {
        let cli = Cli::parse_from([
            "politics_scraper",
            "scrape",
            "-o",
            "nyt",
            "--outlet",
            "wt",
            "-o",
            "nyt",
            "--dedup",
            "link",
            "--data-dir",
            "/tmp/news",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/news"));
        match cli.command {
            Command::Scrape { outlets, dedup } => {
                assert_eq!(outlets.resolve(), vec![Outlet::WashingtonTimes, Outlet::Nyt]);
                assert_eq!(dedup, Some(DedupKey::Link));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_outlet_rejected() {
        assert!(Cli::try_parse_from(["politics_scraper", "init", "-o", "cnn"]).is_err());
    }

    #[test]
    fn test_rules_with_config() {
        let cli = Cli::parse_from(["politics_scraper", "-c", "rules.yaml", "rules", "-o", "ap"]);
        assert_eq!(cli.config, Some(PathBuf::from("rules.yaml")));
        assert!(matches!(cli.command, Command::Rules { .. }));
    }
}
