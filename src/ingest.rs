//! Merge a freshly scraped batch into an outlet's persisted dataset.
//!
//! One ingestion run is a read-merge-write transaction on a single outlet's
//! CSV file:
//!
//! 1. Load the existing records (the file must already exist)
//! 2. Append the batch after them
//! 3. Drop later duplicates, keeping the first occurrence
//! 4. Atomically replace the file with the merged records
//!
//! Runs for the same outlet are serialized through a per-outlet async mutex.
//! Runs for different outlets never share state.

use crate::error::IngestError;
use crate::models::{ArticleRecord, DedupKey, IngestReport};
use crate::outputs::dataset;
use chrono::Local;
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

/// One lock per dataset path, created on first use.
static OUTLET_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn outlet_lock(path: &Path) -> Arc<tokio::sync::Mutex<()>> {
    let mut locks = OUTLET_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(path.to_path_buf()).or_default())
}

/// Concatenate `old` and `batch` and drop duplicates, first occurrence wins.
pub fn merge(old: Vec<ArticleRecord>, batch: Vec<ArticleRecord>, key: DedupKey) -> Vec<ArticleRecord> {
    let combined = old.into_iter().chain(batch);
    match key {
        DedupKey::Row => combined.unique().collect(),
        DedupKey::Link => combined.unique_by(|r| r.link.clone()).collect(),
    }
}

/// Owns the data directory and the duplicate policy for ingestion runs.
#[derive(Debug, Clone)]
pub struct Ingestor {
    data_dir: PathBuf,
    dedup: DedupKey,
}

impl Ingestor {
    pub fn new(data_dir: impl Into<PathBuf>, dedup: DedupKey) -> Self {
        Self {
            data_dir: data_dir.into(),
            dedup,
        }
    }

    /// Path of the dataset file for `outlet_id`.
    pub fn dataset_path(&self, outlet_id: &str) -> PathBuf {
        dataset::dataset_path(&self.data_dir, outlet_id)
    }

    /// Create an empty dataset for `outlet_id` if it has none.
    pub async fn provision(&self, outlet_id: &str) -> Result<bool, IngestError> {
        let path = self.dataset_path(outlet_id);
        let lock = outlet_lock(&path);
        let _guard = lock.lock().await;
        dataset::provision(&path).await
    }

    /// Merge `new_batch` into the outlet's dataset and persist the result.
    ///
    /// The batch is treated as complete and already validated. An empty batch
    /// is allowed and yields a delta of zero.
    ///
    /// # Errors
    ///
    /// - [`IngestError::MissingDataset`] if the outlet was never provisioned
    /// - [`IngestError::Io`] / [`IngestError::Csv`] if the file cannot be
    ///   read, parsed or replaced
    ///
    /// In every error case the dataset on disk is left as it was.
    #[instrument(level = "info", skip(self, new_batch), fields(batch = new_batch.len(), dedup = %self.dedup))]
    pub async fn merge_and_persist(
        &self,
        outlet_id: &str,
        new_batch: Vec<ArticleRecord>,
    ) -> Result<IngestReport, IngestError> {
        let path = self.dataset_path(outlet_id);
        let lock = outlet_lock(&path);
        let _guard = lock.lock().await;

        let old = dataset::load(outlet_id, &path).await?;
        let old_count = old.len();
        let batch_len = new_batch.len();
        if new_batch.is_empty() {
            warn!(outlet = outlet_id, "Empty batch; dataset will be rewritten unchanged");
        }

        let merged = merge(old, new_batch, self.dedup);
        let new_count = merged.len();

        let contents = dataset::render(&merged).map_err(|source| IngestError::Csv {
            path: path.clone(),
            source,
        })?;
        dataset::write_atomic(&path, &contents).await?;

        let report = IngestReport {
            outlet: outlet_id.to_string(),
            old_count,
            new_count,
            batch_len,
            ran_at: Local::now(),
        };
        info!(
            outlet = outlet_id,
            old = old_count,
            new = new_count,
            delta = report.delta(),
            "Dataset updated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;
    use tokio::fs;

    fn rec(link: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            publisher: "AP".to_string(),
            date: Some("2020-01-01".to_string()),
            link: link.to_string(),
            title: title.to_string(),
            body_text: "x".to_string(),
        }
    }

    async fn provisioned(label: &str, key: DedupKey) -> Ingestor {
        let ingestor = Ingestor::new(scratch_dir(label).await, key);
        assert!(ingestor.provision("ap").await.unwrap());
        ingestor
    }

    async fn stored(ingestor: &Ingestor) -> Vec<ArticleRecord> {
        dataset::load("ap", &ingestor.dataset_path("ap")).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_dataset_takes_batch_in_order() {
        let ingestor = provisioned("empty_takes_batch", DedupKey::Row).await;
        let batch = vec![rec("c", "C"), rec("a", "A"), rec("b", "B")];

        let report = ingestor.merge_and_persist("ap", batch.clone()).await.unwrap();

        assert_eq!(report.old_count, 0);
        assert_eq!(report.new_count, 3);
        assert_eq!(report.delta(), 3);
        assert_eq!(stored(&ingestor).await, batch);
    }

    #[tokio::test]
    async fn test_resubmitting_same_batch_is_idempotent() {
        let ingestor = provisioned("idempotent", DedupKey::Row).await;
        let batch = vec![rec("a", "A"), rec("b", "B")];

        let first = ingestor.merge_and_persist("ap", batch.clone()).await.unwrap();
        let second = ingestor.merge_and_persist("ap", batch.clone()).await.unwrap();

        assert_eq!(first.delta(), 2);
        assert_eq!(second.delta(), 0);
        assert_eq!(second.old_count, 2);
        assert_eq!(stored(&ingestor).await, batch);
    }

    #[tokio::test]
    async fn test_duplicates_inside_batch_collapse() {
        let ingestor = provisioned("batch_dupes", DedupKey::Row).await;
        let batch = vec![rec("a", "A"), rec("a", "A")];

        let report = ingestor.merge_and_persist("ap", batch).await.unwrap();

        assert_eq!(report.new_count, 1);
        assert_eq!(stored(&ingestor).await, vec![rec("a", "A")]);
    }

    #[tokio::test]
    async fn test_old_records_stay_ahead_of_new_ones() {
        let ingestor = provisioned("order", DedupKey::Row).await;
        ingestor
            .merge_and_persist("ap", vec![rec("z", "Z"), rec("y", "Y")])
            .await
            .unwrap();
        ingestor
            .merge_and_persist("ap", vec![rec("a", "A"), rec("z", "Z")])
            .await
            .unwrap();

        let links: Vec<String> = stored(&ingestor).await.into_iter().map(|r| r.link).collect();
        assert_eq!(links, vec!["z", "y", "a"]);
    }

    #[tokio::test]
    async fn test_exact_duplicate_plus_new_article() {
        let ingestor = provisioned("scenario", DedupKey::Row).await;
        ingestor.merge_and_persist("ap", vec![rec("a", "A")]).await.unwrap();

        let report = ingestor
            .merge_and_persist("ap", vec![rec("a", "A"), rec("b", "B")])
            .await
            .unwrap();

        assert_eq!(report.old_count, 1);
        assert_eq!(report.new_count, 2);
        assert_eq!(report.delta(), 1);
        assert_eq!(stored(&ingestor).await, vec![rec("a", "A"), rec("b", "B")]);
    }

    #[tokio::test]
    async fn test_row_dedup_keeps_near_duplicates() {
        let ingestor = provisioned("near_dupes_row", DedupKey::Row).await;
        let mut redated = rec("a", "A");
        redated.date = Some("2020-01-02".to_string());

        let report = ingestor
            .merge_and_persist("ap", vec![rec("a", "A"), redated])
            .await
            .unwrap();
        assert_eq!(report.new_count, 2);
    }

    #[tokio::test]
    async fn test_link_dedup_keeps_first_version() {
        let ingestor = provisioned("near_dupes_link", DedupKey::Link).await;
        let mut redated = rec("a", "A");
        redated.date = Some("2020-01-02".to_string());

        let report = ingestor
            .merge_and_persist("ap", vec![rec("a", "A"), redated])
            .await
            .unwrap();
        assert_eq!(report.new_count, 1);
        assert_eq!(stored(&ingestor).await, vec![rec("a", "A")]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_an_error() {
        let ingestor = provisioned("empty_batch", DedupKey::Row).await;
        ingestor.merge_and_persist("ap", vec![rec("a", "A")]).await.unwrap();

        let report = ingestor.merge_and_persist("ap", vec![]).await.unwrap();
        assert_eq!(report.batch_len, 0);
        assert_eq!(report.delta(), 0);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_rejected_without_writing() {
        let ingestor = Ingestor::new(scratch_dir("unprovisioned").await, DedupKey::Row);

        let err = ingestor
            .merge_and_persist("nyt", vec![rec("a", "A")])
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::MissingDataset { .. }));
        assert!(!ingestor.dataset_path("nyt").exists());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_dataset_unchanged() {
        let ingestor = provisioned("failed_write", DedupKey::Row).await;
        ingestor.merge_and_persist("ap", vec![rec("a", "A")]).await.unwrap();
        let path = ingestor.dataset_path("ap");
        let before = fs::read(&path).await.unwrap();

        // Block the temp file slot so the replacement cannot be written.
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        fs::create_dir_all(&tmp).await.unwrap();

        let result = ingestor.merge_and_persist("ap", vec![rec("b", "B")]).await;
        assert!(matches!(result, Err(IngestError::Io { .. })));
        assert_eq!(fs::read(&path).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_concurrent_runs_on_one_outlet_do_not_lose_rows() {
        let ingestor = provisioned("concurrent", DedupKey::Row).await;
        let runs = (0..8).map(|i| {
            let ingestor = ingestor.clone();
            tokio::spawn(async move {
                ingestor
                    .merge_and_persist("ap", vec![rec(&format!("l{i}"), "T")])
                    .await
            })
        });
        for handle in futures::future::join_all(runs).await {
            handle.unwrap().unwrap();
        }
        assert_eq!(stored(&ingestor).await.len(), 8);
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let merged = merge(
            vec![rec("a", "A"), rec("a", "A")],
            vec![rec("b", "B"), rec("a", "A")],
            DedupKey::Row,
        );
        assert_eq!(merged, vec![rec("a", "A"), rec("b", "B")]);
    }
}
