//! CSV dataset files, one per outlet.
//!
//! # File Layout
//!
//! ```text
//! data_dir/
//! ├── breitbart_data.csv
//! ├── fox_data.csv
//! └── nyt_data.csv
//! ```
//!
//! Each file starts with the header row `publisher,date,link,article_title,article_text`
//! and is UTF-8 encoded.
//!
//! # Replacement
//!
//! Files are never rewritten in place. [`write_atomic`] writes the full
//! content to `<file>.tmp`, syncs it and renames it over the dataset, so a
//! failure at any point leaves either the old file or the complete new one.

use crate::error::IngestError;
use crate::models::{ArticleRecord, CSV_COLUMNS};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

/// Location of an outlet's dataset inside `data_dir`.
pub fn dataset_path(data_dir: &Path, outlet_id: &str) -> PathBuf {
    data_dir.join(format!("{outlet_id}_data.csv"))
}

/// Sibling path used while a replacement is being written.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load every record of a dataset, in file order.
///
/// A missing file is a [`IngestError::MissingDataset`]: datasets must be
/// provisioned explicitly. An empty or header-only file is an empty dataset.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn load(outlet_id: &str, path: &Path) -> Result<Vec<ArticleRecord>, IngestError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(IngestError::MissingDataset {
                outlet: outlet_id.to_string(),
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(IngestError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let records = parse(&bytes).map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(count = records.len(), "Loaded dataset");
    Ok(records)
}

/// Parse CSV bytes with a header row into records.
pub fn parse(bytes: &[u8]) -> Result<Vec<ArticleRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    reader.deserialize().collect()
}

/// Render records as CSV. The header row is always present, even for an
/// empty dataset.
pub fn render(records: &[ArticleRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Replace `path` with `contents` without ever exposing a partial file.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), bytes = contents.len()))]
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), IngestError> {
    let tmp = temp_path(path);
    let io_err = |source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    };

    let result: std::io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = result {
        warn!(tmp = %tmp.display(), error = %e, "Dataset write failed; discarding temp file");
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            debug!(error = %cleanup, "Temp file cleanup skipped");
        }
        return Err(io_err(e));
    }
    Ok(())
}

/// Create an empty (header-only) dataset if none exists.
///
/// Returns `true` when a file was created and `false` when one was already
/// there. An existing dataset is never touched.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn provision(path: &Path) -> Result<bool, IngestError> {
    let exists = fs::try_exists(path).await.map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if exists {
        info!("Dataset already present");
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| IngestError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let header = render(&[]).map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &header).await?;
    info!("Provisioned empty dataset");
    Ok(true)
}
