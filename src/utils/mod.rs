//! Utilities for path collection and size formatting.

use crate::error::{PdfKnifeError, Result};
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths.
///
/// Patterns are expanded in the order given, so the caller's ordering of
/// arguments is preserved. Within one pattern, matches come back in the
/// alphabetical order produced by `glob`. A pattern without glob
/// metacharacters is passed through unchanged even when the file does not
/// exist, so the reader can report it as missing.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./scans/*.pdf"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();

    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| {
        PdfKnifeError::invalid_config(format!("Invalid glob pattern '{pattern}': {err}"))
    })?;

    for entry in paths {
        let path = entry.map_err(|err| PdfKnifeError::FileNotAccessible {
            path: err.path().to_path_buf(),
            source: err.into(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Format a byte count as a human-readable string.
///
/// Returns strings like "1.50 MB" or "234 bytes".
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
