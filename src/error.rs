//! Error types for scraping, ingestion and configuration.

use std::path::PathBuf;

/// Errors raised while fetching or parsing an outlet's pages.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    /// A listing link or base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A CSS selector in the outlet rules does not parse.
    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// A `strip_pattern` in the outlet rules is not a valid regex.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised by the ingestor. All of them abort the ingestion run for
/// one outlet and leave its dataset untouched.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// No dataset has been provisioned for this outlet yet.
    #[error("no dataset for outlet `{outlet}` at {} (run `init` first)", .path.display())]
    MissingDataset { outlet: String, path: PathBuf },

    /// Reading or writing the dataset file failed.
    #[error("storage I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file exists but is not valid CSV for [`crate::models::ArticleRecord`].
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors raised while loading the YAML configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown outlet `{0}` in config")]
    UnknownOutlet(String),
}
