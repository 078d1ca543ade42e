//! Output-directory clean pass
//!
//! Deletes every top-level entry of the output directory before a build.
//! One locked or undeletable entry must not abort the pass: each failure
//! is collected into the report and the remaining entries are still
//! attempted. Only failing to list the directory at all is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::utils::paths::format_size;
use crate::utils::terminal;

/// Outcome of one clean pass
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Entries that were removed
    pub removed: Vec<PathBuf>,
    /// Entries that could not be removed, with the error text
    pub failed: Vec<(PathBuf, String)>,
    /// Bytes freed by the removed entries
    pub freed_bytes: u64,
}

impl CleanReport {
    pub fn all_removed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove every entry under `dir`, tolerating per-entry failures.
///
/// Files and symlinks are unlinked (a symlink to a directory is unlinked,
/// never followed); directories are removed recursively.
pub fn clean_dir(dir: &Path) -> Result<CleanReport> {
    let mut report = CleanReport::default();

    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list '{}'", dir.display()))?;
        let path = entry.path();
        let size = entry_size(&path);

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                report.failed.push((path, err.to_string()));
                continue;
            }
        };
        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };

        match result {
            Ok(()) => {
                report.freed_bytes += size;
                report.removed.push(path);
            }
            Err(err) => report.failed.push((path, err.to_string())),
        }
    }

    Ok(report)
}

/// Clean `dir` and narrate the pass on the console
pub fn clean_output_dir(dir: &Path) -> Result<CleanReport> {
    println!("Removing contents of '{}'..", dir.display());

    let report = clean_dir(dir)?;
    if !report.all_removed() {
        for (path, err) in &report.failed {
            terminal::print_warning(&format!("couldn't delete '{}' ({})", path.display(), err));
        }
    }
    if !report.removed.is_empty() {
        println!(
            "Removed {} entries ({})",
            report.removed.len(),
            format_size(report.freed_bytes)
        );
    }

    Ok(report)
}

/// Recursive size of an entry, best-effort
fn entry_size(path: &Path) -> u64 {
    if path.is_dir() && !path.is_symlink() {
        WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.metadata().ok())
            .filter(|metadata| metadata.is_file())
            .map(|metadata| metadata.len())
            .sum()
    } else {
        path.symlink_metadata().map(|m| m.len()).unwrap_or(0)
    }
}
