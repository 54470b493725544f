//! Small string and file system helpers.
//!
//! - Text cleanup shared by the outlet rules (whitespace collapsing, character trimming)
//! - String truncation for log previews
//! - Data directory validation

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backed off to a char boundary) with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Collapse every run of whitespace (including newlines and tabs) into a
/// single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop `start` characters from the front and `end` characters from the back.
///
/// Mirrors slice-style trimming of fixed timestamp suffixes such as
/// `"2020-10-01T12:00:00-04:00"` minus a trailing offset. Returns an empty
/// string when the input is too short.
pub fn trim_chars(s: &str, start: usize, end: usize) -> String {
    let count = s.chars().count();
    if start.saturating_add(end) >= count {
        return String::new();
    }
    s.chars().skip(start).take(count - start - end).collect()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Data directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Fresh, empty directory under the system temp dir for one test.
#[cfg(test)]
pub async fn scratch_dir(label: &str) -> std::path::PathBuf {
    use rand::Rng;
    let suffix: u64 = rand::rng().random();
    let dir = std::env::temp_dir().join(format!(
        "politics_scraper_{label}_{}_{suffix:x}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).await.unwrap();
    dir
}
