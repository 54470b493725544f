//! Per-outlet scrapers for politics-section articles.
//!
//! Every outlet follows the same two-phase pattern, driven entirely by its
//! [`OutletRules`]:
//!
//! 1. **Indexing**: fetch the section front page and collect article links
//! 2. **Fetching**: fetch each article in turn and extract title, date and body
//!
//! # Supported Outlets
//!
//! | Id | Module | Publisher | Listing |
//! |----|--------|-----------|---------|
//! | `breitbart` | [`breitbart`] | Breitbart | breitbart.com/politics |
//! | `fox` | [`fox`] | Fox | foxnews.com/politics |
//! | `wt` | [`washington_times`] | washington_times | washingtontimes.com/news/politics |
//! | `ap` | [`apnews`] | AP | apnews.com/apf-politics |
//! | `nbc` | [`nbc`] | nbc | nbcnews.com/politics |
//! | `nyt` | [`nyt`] | new_york_times | nytimes.com/section/politics |
//! | `politico` | [`politico`] | politico | politico.com/politics |
//! | `buzzfeed` | [`buzzfeed`] | buzzfeed | buzzfeednews.com/section/politics |
//!
//! Articles are fetched one at a time. A failed article is logged and
//! skipped; a failed listing page fails the whole outlet. The batch is only
//! returned once every article has been attempted.

pub mod apnews;
pub mod breitbart;
pub mod buzzfeed;
pub mod extract;
pub mod fox;
pub mod nbc;
pub mod nyt;
pub mod politico;
pub mod rules;
pub mod washington_times;

use crate::error::ScrapeError;
use crate::http::FetchPage;
use crate::models::ArticleRecord;
use extract::{CompiledRules, extract_article, extract_listing};
use futures::stream::{self, StreamExt};
use rules::OutletRules;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

/// The outlets this tool knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Outlet {
    Breitbart,
    Fox,
    #[value(name = "wt")]
    WashingtonTimes,
    Ap,
    Nbc,
    Nyt,
    Politico,
    Buzzfeed,
}

impl Outlet {
    pub const ALL: [Outlet; 8] = [
        Outlet::Breitbart,
        Outlet::Fox,
        Outlet::WashingtonTimes,
        Outlet::Ap,
        Outlet::Nbc,
        Outlet::Nyt,
        Outlet::Politico,
        Outlet::Buzzfeed,
    ];

    /// Stable id used for dataset file names and config keys.
    pub fn id(self) -> &'static str {
        match self {
            Outlet::Breitbart => "breitbart",
            Outlet::Fox => "fox",
            Outlet::WashingtonTimes => "wt",
            Outlet::Ap => "ap",
            Outlet::Nbc => "nbc",
            Outlet::Nyt => "nyt",
            Outlet::Politico => "politico",
            Outlet::Buzzfeed => "buzzfeed",
        }
    }

    pub fn from_id(id: &str) -> Option<Outlet> {
        Outlet::ALL.into_iter().find(|o| o.id() == id)
    }

    /// Built-in extraction rules.
    pub fn default_rules(self) -> OutletRules {
        match self {
            Outlet::Breitbart => breitbart::rules(),
            Outlet::Fox => fox::rules(),
            Outlet::WashingtonTimes => washington_times::rules(),
            Outlet::Ap => apnews::rules(),
            Outlet::Nbc => nbc::rules(),
            Outlet::Nyt => nyt::rules(),
            Outlet::Politico => politico::rules(),
            Outlet::Buzzfeed => buzzfeed::rules(),
        }
    }
}

impl fmt::Display for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Scrape one outlet's listing page and every article it links to.
///
/// # Errors
///
/// Fails if the rules do not compile or the listing page cannot be fetched.
/// Individual article failures are logged and skipped.
#[instrument(level = "info", skip_all, fields(publisher = %rules.publisher))]
pub async fn scrape_outlet<F: FetchPage>(
    fetcher: &F,
    rules: &OutletRules,
) -> Result<Vec<ArticleRecord>, ScrapeError> {
    let compiled = CompiledRules::new(rules)?;

    let listing_html = fetcher.fetch(&rules.listing.url).await?;
    let entries = extract_listing(&compiled, &listing_html);
    info!(count = entries.len(), source = %rules.listing.url, "Indexed article links");
    if entries.is_empty() {
        warn!(source = %rules.listing.url, "Listing matched no articles; selectors may be stale");
    }

    let compiled = &compiled;
    let records: Vec<ArticleRecord> = stream::iter(entries)
        .then(|entry| async move {
            match fetcher.fetch(&entry.link).await {
                Ok(html) => {
                    let record = extract_article(compiled, &entry, &html);
                    if record.is_some() {
                        debug!(url = %entry.link, "Extracted article");
                    } else {
                        warn!(url = %entry.link, "Article produced no record");
                    }
                    record
                }
                Err(e) => {
                    error!(error = %e, url = %entry.link, "Article fetch failed");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = records.len(), "Fetched article contents");
    Ok(records)
}
