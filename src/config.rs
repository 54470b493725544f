//! YAML configuration: HTTP behavior, duplicate policy and rule overrides.
//!
//! Every section is optional; a missing file or an empty document gives the
//! built-in defaults.
//!
//! ```yaml
//! http:
//!   timeout_secs: 20
//!   max_retries: 2
//! dedup: row
//! outlets:
//!   nyt:
//!     publisher: new_york_times
//!     listing: { ... }
//! ```

use crate::error::ConfigError;
use crate::models::DedupKey;
use crate::scrapers::Outlet;
use crate::scrapers::rules::OutletRules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Extra attempts after the first failure.
    pub max_retries: usize,
    /// First backoff delay; doubles per attempt.
    pub base_delay_ms: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            base_delay_ms: 1000,
            user_agent: concat!("politics_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpSettings,
    pub dedup: DedupKey,
    /// Full rule sets that replace the built-in rules, keyed by outlet id.
    pub outlets: BTreeMap<String, OutletRules>,
}

impl Config {
    /// Parse a YAML document, rejecting overrides for unknown outlets.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        if let Some(unknown) = config.outlets.keys().find(|id| Outlet::from_id(id).is_none()) {
            return Err(ConfigError::UnknownOutlet(unknown.clone()));
        }
        Ok(config)
    }

    /// Load the config file at `path`, or defaults when no path is given.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&yaml)?;
        info!(
            path = %path.display(),
            overrides = config.outlets.len(),
            dedup = %config.dedup,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Rules in effect for `outlet`: the override if present, else the built-in set.
    pub fn rules_for(&self, outlet: Outlet) -> OutletRules {
        self.outlets
            .get(outlet.id())
            .cloned()
            .unwrap_or_else(|| outlet.default_rules())
    }
}
