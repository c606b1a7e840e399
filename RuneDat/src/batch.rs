//! Batch model conversion
//!
//! Finds `.dat` models under a directory and transcodes them in parallel,
//! mirroring the source directory structure in the destination.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::Result;
use crate::formats::{ModelFormat, read_model, write_model};

/// Options for [`convert_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConvertOptions {
    /// Layout every model is written in.
    pub target: ModelFormat,
    /// Layout of the source models; detected per file when `None`.
    pub source: Option<ModelFormat>,
}

impl Default for BatchConvertOptions {
    fn default() -> Self {
        Self {
            target: ModelFormat::Dat317,
            source: None,
        }
    }
}

/// Progress update for a batch conversion
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// File being converted, relative to the source directory
    pub current_file: Option<String>,
}

impl BatchProgress {
    #[must_use]
    pub fn with_file(current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Result of a batch conversion
#[derive(Debug, Clone)]
pub struct BatchConvertResult {
    /// Number of successful conversions
    pub success_count: usize,
    /// Number of failed conversions
    pub fail_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

/// Find all .dat files in a directory recursively
///
/// # Returns
/// A sorted list of paths to .dat files found in the directory tree.
///
/// # Errors
/// Returns [`crate::Error::WalkDirError`] if the directory or any entry
/// below it cannot be read.
pub fn find_model_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dat"))
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Convert every model under `source_dir` into `dest_dir`.
///
/// Each file keeps its path relative to `source_dir`. A file that fails to
/// convert is counted and reported in the results without stopping the
/// batch.
///
/// # Arguments
/// * `source_dir` - Directory to search for models
/// * `dest_dir` - Destination directory for converted models
/// * `options` - Source and target layouts
/// * `progress` - Callback for progress updates
///
/// # Errors
/// Returns an error if the source tree cannot be walked.
pub fn convert_directory<F>(
    source_dir: &Path,
    dest_dir: &Path,
    options: &BatchConvertOptions,
    progress: F,
) -> Result<BatchConvertResult>
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let files = find_model_files(source_dir)?;
    tracing::info!(
        "Converting {} models from {} to {} ({})",
        files.len(),
        source_dir.display(),
        dest_dir.display(),
        options.target
    );

    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = files
        .par_iter()
        .map(|path| {
            let relative_path = path.strip_prefix(source_dir).unwrap_or(path.as_path());
            let display_path = relative_path.to_string_lossy();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress::with_file(current, total, display_path.to_string()));

            match convert_one(path, &dest_dir.join(relative_path), options) {
                Ok(format) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Converted: {display_path} ({format} → {})", options.target)
                }
                Err(e) => {
                    tracing::warn!("Failed to convert {display_path}: {e}");
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    Ok(BatchConvertResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    })
}

fn convert_one(source: &Path, dest: &Path, options: &BatchConvertOptions) -> Result<ModelFormat> {
    let (mesh, format) = read_model(source, options.source)?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_model(dest, &mesh, options.target)?;
    Ok(format)
}
