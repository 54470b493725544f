//! Data models shared by the extractor and the ingestor.
//!
//! - [`ArticleRecord`]: one scraped article, exactly as stored in an outlet's CSV file
//! - [`IngestReport`]: the before/after/delta summary of one ingestion run
//! - [`DedupKey`]: which fields decide that two records are duplicates
//!
//! The serde field names are the CSV column names, so the column order of the
//! persisted files follows the field order of [`ArticleRecord`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scraped article.
///
/// Equality and hashing cover every field, which is what "full-row duplicate"
/// means for the ingestor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Canonical publisher name, constant across one outlet's dataset.
    pub publisher: String,
    /// Publication timestamp in the outlet's own format. Not normalized.
    pub date: Option<String>,
    /// Canonical article URL.
    pub link: String,
    /// Article headline.
    #[serde(rename = "article_title")]
    pub title: String,
    /// Paragraph text joined with single spaces.
    #[serde(rename = "article_text")]
    pub body_text: String,
}

/// CSV header row written to every dataset file.
pub const CSV_COLUMNS: [&str; 5] = ["publisher", "date", "link", "article_title", "article_text"];

/// How the ingestor decides two records are the same article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DedupKey {
    /// Every field must match. Matches the historical behavior of the datasets.
    #[default]
    Row,
    /// Only `link` must match. A re-scraped article with a changed date or
    /// whitespace is dropped instead of stored twice.
    Link,
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupKey::Row => write!(f, "row"),
            DedupKey::Link => write!(f, "link"),
        }
    }
}

/// Outcome of one `merge_and_persist` call.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Outlet id the dataset belongs to.
    pub outlet: String,
    /// Rows in the dataset before the merge.
    pub old_count: usize,
    /// Rows in the dataset after the merge.
    pub new_count: usize,
    /// Rows in the batch handed to the ingestor.
    pub batch_len: usize,
    /// When the merged dataset was written.
    pub ran_at: DateTime<Local>,
}

impl IngestReport {
    /// `new_count - old_count`. Signed: collapsing duplicates that were
    /// already present in a legacy file can shrink it.
    pub fn delta(&self) -> i64 {
        self.new_count as i64 - self.old_count as i64
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of entries in old {} data: {}", self.outlet, self.old_count)?;
        writeln!(f, "total number of entries in new {} data: {}", self.outlet, self.new_count)?;
        write!(f, "difference: {}", self.delta())
    }
}
