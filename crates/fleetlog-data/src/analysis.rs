//! Directory scan pipeline.
//!
//! Lists the candidate log files of a directory, identifies each device,
//! filters its lines and merges everything into a [`FleetAggregator`].
//! Files are processed one at a time in file-name order; a failure in one
//! file never stops the others.

use std::path::{Path, PathBuf};

use fleetlog_core::error::{Result, ScanError};
use fleetlog_core::models::FilterConfig;
use tracing::{info, warn};

use crate::aggregator::FleetAggregator;
use crate::filter::{FileScan, LineFilter};
use crate::identity::identify_file;
use crate::reader::{device_id_from_path, find_log_files};

// ── Public types ──────────────────────────────────────────────────────────────

/// What to scan and how to filter it.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Suffix a file name must end with, e.g. `".log"`.
    pub extension: String,
    /// File name never treated as input (the report itself).
    pub exclude_name: Option<String>,
    pub filter: FilterConfig,
}

/// Counters describing one directory run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScanMetadata {
    pub files_found: usize,
    pub files_scanned: usize,
    /// Files that could not be read or decoded.
    pub files_failed: usize,
    pub lines_matched: usize,
}

/// The complete output of [`process_directory`].
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub aggregator: FleetAggregator,
    pub metadata: ScanMetadata,
    /// Files in the order they were processed.
    pub files: Vec<PathBuf>,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Scan every candidate log file in `dir`.
///
/// Returns [`ScanError::DirectoryNotFound`] when `dir` is not a directory;
/// per-file problems are logged and counted instead.
pub fn process_directory(dir: &Path, options: &ScanOptions) -> Result<ScanResult> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }

    let files = find_log_files(dir, &options.extension, options.exclude_name.as_deref());
    if files.is_empty() {
        warn!(
            "No files ending in {} found in {}",
            options.extension,
            dir.display()
        );
    }

    let filter = LineFilter::new(&options.filter);
    let mut aggregator = FleetAggregator::new();
    let mut metadata = ScanMetadata {
        files_found: files.len(),
        ..ScanMetadata::default()
    };

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing {}", name);

        let device_id = device_id_from_path(path);
        let record = identify_file(path, &device_id);

        let scan = match filter.filter_file(path) {
            Ok(scan) => {
                metadata.files_scanned += 1;
                scan
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                metadata.files_failed += 1;
                FileScan::default()
            }
        };

        metadata.lines_matched += scan.lines_matched;
        aggregator.merge_scan(record, &scan);
    }

    info!(
        "Scanned {} of {} files, {} matching lines on {} devices",
        metadata.files_scanned,
        metadata.files_found,
        metadata.lines_matched,
        aggregator.stats().error_device_count(),
    );

    Ok(ScanResult {
        aggregator,
        metadata,
        files,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
