//! JSON export discovery and loading.
//!
//! The persistence collaborators (directory lookup, report query, snapshot
//! store) drop their output as JSON files under a data directory. File stems
//! route each file to the right loader:
//!
//! * `own_directory*.json`   — entries of the own-process directory
//! * `other_directory*.json` — entries of the cross-process directory
//! * `counts*.json`          — raw per-operator per-date count rows
//! * `snapshots*.json`       — historical per-operator backlog series
//!
//! Unreadable or unparsable files are logged and skipped; a missing data
//! directory or a directory without any JSON file is an error the caller
//! can surface.

use std::path::{Path, PathBuf};

use caseload_core::error::{ReportError, Result};
use caseload_core::models::{DirectoryEntry, HistoricalSeriesRow, RawCountRow, Team};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analysis::ReportInput;

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` files recursively under `data_path`, sorted by path.
pub fn find_json_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every collaborator export under `data_path` into a [`ReportInput`].
///
/// * `data_path` – directory to scan (defaults to
///   `~/.caseload-monitor/data`).
///
/// Files that fail to read or parse are logged and skipped so one bad export
/// cannot take down the whole report.
pub fn load_report_input(data_path: Option<&str>) -> Result<ReportInput> {
    let path = resolve_data_path(data_path);
    if !path.exists() {
        return Err(ReportError::DataPathNotFound(path));
    }

    let files = find_json_files(&path);
    if files.is_empty() {
        return Err(ReportError::NoDataFiles(path));
    }

    let mut input = ReportInput::default();
    for file in &files {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if stem.starts_with("own_directory") {
            if let Some(rows) = load_json_array::<DirectoryExportRow>(file) {
                input
                    .own_directory
                    .extend(rows.into_iter().map(DirectoryExportRow::into_entry));
            }
        } else if stem.starts_with("other_directory") {
            if let Some(rows) = load_json_array::<DirectoryExportRow>(file) {
                input
                    .other_directory
                    .extend(rows.into_iter().map(DirectoryExportRow::into_entry));
            }
        } else if stem.starts_with("counts") {
            if let Some(rows) = load_json_array::<RawCountRow>(file) {
                input.count_rows.extend(rows);
            }
        } else if stem.starts_with("snapshots") {
            if let Some(rows) = load_json_array::<HistoricalSeriesRow>(file) {
                input.historical.extend(rows);
            }
        } else {
            debug!("Ignoring unrecognised export file {}", file.display());
        }
    }

    debug!(
        "Loaded {} own-directory, {} other-directory entries, {} count rows, \
         {} snapshot rows from {}",
        input.own_directory.len(),
        input.other_directory.len(),
        input.count_rows.len(),
        input.historical.len(),
        path.display()
    );

    Ok(input)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// On-disk shape of a directory export row. The comparison key is derived
/// here rather than trusted from the export.
#[derive(Debug, Deserialize)]
struct DirectoryExportRow {
    display_name: String,
    #[serde(default)]
    team: Team,
}

impl DirectoryExportRow {
    fn into_entry(self) -> DirectoryEntry {
        DirectoryEntry::new(self.display_name, self.team)
    }
}

/// Read one file as a JSON array of `T`, logging and returning `None` on any
/// failure.
fn load_json_array<T: DeserializeOwned>(path: &Path) -> Option<Vec<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!("Error parsing {}: {}", path.display(), e);
            None
        }
    }
}

/// Resolve the data path: use `data_path` when given, otherwise fall back
/// to `~/.caseload-monitor/data`.
fn resolve_data_path(data_path: Option<&str>) -> PathBuf {
    if let Some(p) = data_path {
        return PathBuf::from(p);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".caseload-monitor").join("data")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
