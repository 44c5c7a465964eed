//! Locating and loading cost estimate files

use crate::core::combine::{ReportInput, FILENAME_KEY};
use crate::core::document::Document;
use crate::core::version::ensure_supported;
use crate::CostfoldError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expand glob patterns into file paths.
///
/// Patterns are expanded in the order given; matches within a pattern come
/// out in glob's (alphabetical) order. A pattern with no glob metacharacters
/// that names an existing file is kept as is.
pub fn expand_paths(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(paths) => {
                let before = files.len();
                for entry in paths {
                    match entry {
                        Ok(path) if path.is_file() => files.push(path),
                        Ok(path) => debug!("Skipping {}: not a file", path.display()),
                        Err(e) => warn!("Cannot read {}: {}", e.path().display(), e.error()),
                    }
                }
                if files.len() == before {
                    debug!("Pattern '{}' matched no files", pattern);
                }
            }
            Err(e) => warn!("Invalid path pattern '{}': {}", pattern, e),
        }
    }
    files
}

/// Read, parse and version-check one file.
pub fn load_file(path: &Path) -> Result<ReportInput, CostfoldError> {
    let data = std::fs::read(path)?;
    let document = Document::from_slice(&data).map_err(|e| CostfoldError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    ensure_supported(&document.version)?;

    debug!(
        "Loaded {} (version {}, {} project(s))",
        path.display(),
        document.version,
        document.projects.len()
    );

    Ok(ReportInput::new(document).with_metadata(FILENAME_KEY, path.to_string_lossy()))
}

/// Load every file matched by `patterns`.
///
/// Fails on the first unreadable, unparseable or unsupported file so a
/// mixed batch never produces a partial report.
pub fn load_inputs(patterns: &[String]) -> Result<Vec<ReportInput>, CostfoldError> {
    let files = expand_paths(patterns);
    if files.is_empty() {
        return Err(CostfoldError::NoInputs(format!(
            "No cost estimate files found matching: {}",
            patterns.join(", ")
        )));
    }

    files.iter().map(|f| load_file(f)).collect()
}
