/*!
 * Recursive discovery of files by extension
 */

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::normalize_extension;
use crate::error::{ExtCopyError, Result};
use crate::types::FileMatch;
use crate::utils::is_hidden;

/// Finds regular, non-hidden files with a given extension
///
/// Symbolic links are never followed and never matched: only entries whose
/// own file type is a regular file are returned. Hidden entries (leading
/// dot) are skipped together with their subtrees.
#[derive(Debug, Clone)]
pub struct Finder {
    extension: String,
}

impl Finder {
    /// Create a finder for `extension` (normalized to lowercase, no dot)
    pub fn new(extension: impl AsRef<str>) -> Self {
        Self {
            extension: normalize_extension(extension.as_ref()),
        }
    }

    /// The extension this finder matches
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Walk `source_dir` and return every matching file
    ///
    /// Fails only when the root itself cannot be read. Unreadable entries
    /// further down are logged and skipped. The result order is unspecified.
    pub fn find(&self, source_dir: &Path) -> Result<Vec<FileMatch>> {
        fs::read_dir(source_dir).map_err(|e| ExtCopyError::access(source_dir, e))?;

        let mut matches = Vec::new();
        let walker = WalkDir::new(source_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e.into_io_error().unwrap_or_else(|| {
                        io::Error::new(io::ErrorKind::Other, "unreadable directory")
                    });
                    return Err(ExtCopyError::access(source_dir, source));
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if self.matches(&entry) {
                if let Some(file) = FileMatch::from_path(entry.path()) {
                    debug!("Matched {}", entry.path().display());
                    matches.push(file);
                }
            }
        }

        debug!(
            "Found {} .{} files under {}",
            matches.len(),
            self.extension,
            source_dir.display()
        );
        Ok(matches)
    }

    /// Check whether a walked entry is a matching regular file
    fn matches(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file() && self.matches_extension(entry.path())
    }

    /// Case-insensitive comparison of the path's extension
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}
