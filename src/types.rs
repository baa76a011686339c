/*!
 * Core types and data structures for extcopy
 */

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::{ErrorKind, ExtCopyError};

/// A file discovered by the finder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMatch {
    /// Absolute path of the file
    pub path: PathBuf,
    /// File name including extension, kept byte for byte
    #[serde(serialize_with = "serialize_lossy")]
    pub base_name: OsString,
    /// Lowercase extension without the dot
    pub extension: String,
}

impl FileMatch {
    /// Build a match from a path whose extension is already known to match.
    /// Returns `None` for paths without a file name or extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let base_name = path.file_name()?.to_os_string();
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        Some(Self {
            path: path.to_path_buf(),
            base_name,
            extension,
        })
    }
}

fn serialize_lossy<S: Serializer>(name: &OsString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&name.to_string_lossy())
}

/// A match paired with the destination it will be written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    /// The source file
    pub file: FileMatch,
    /// Resolved, collision-free destination
    pub destination: PathBuf,
}

/// The most recent per-file error of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ExtCopyError> for LastError {
    fn from(err: &ExtCopyError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Aggregate state of a batch copy
///
/// Only the most recent failure is retained in `last_error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyOutcome {
    /// Number of files found
    pub total: usize,
    /// Files copied successfully
    pub successes: usize,
    /// Files that failed to copy
    pub failures: usize,
    /// Last per-file error, if any
    pub last_error: Option<LastError>,
    /// Bytes written to the destination
    pub bytes_copied: u64,
}

impl CopyOutcome {
    /// Start an outcome for `total` files
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Record one successful copy
    pub fn record_success(&mut self, bytes: u64) {
        self.successes += 1;
        self.bytes_copied += bytes;
    }

    /// Record one failed copy, replacing the previous last error
    pub fn record_failure(&mut self, err: &ExtCopyError) {
        self.failures += 1;
        self.last_error = Some(LastError::from(err));
    }

    /// Number of files attempted so far
    pub fn attempted(&self) -> usize {
        self.successes + self.failures
    }

    /// Every found file has been attempted
    pub fn is_complete(&self) -> bool {
        self.attempted() == self.total
    }

    /// Nothing was found
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Immutable progress snapshot sent after each successful copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyProgress {
    /// Files copied so far
    pub copied: usize,
    /// Files found in total
    pub total: usize,
    /// Destination of the file just copied
    pub current: Option<PathBuf>,
}

impl CopyProgress {
    /// Progress percentage, 0 when nothing was found
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }

        ((self.copied * 100) / self.total) as u8
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_file_match_from_path() {
        let m = FileMatch::from_path(Path::new("/photos/trip/IMG_01.JPG")).unwrap();
        assert_eq!(m.base_name, "IMG_01.JPG");
        assert_eq!(m.extension, "jpg");

        assert!(FileMatch::from_path(Path::new("/photos/README")).is_none());
    }

    #[test]
    fn test_outcome_accounting() {
        let mut outcome = CopyOutcome::new(3);
        outcome.record_success(10);
        outcome.record_failure(&ExtCopyError::Copy {
            from: PathBuf::from("a"),
            to: PathBuf::from("b"),
            source: io::Error::new(io::ErrorKind::Other, "first"),
        });
        outcome.record_failure(&ExtCopyError::Copy {
            from: PathBuf::from("c"),
            to: PathBuf::from("d"),
            source: io::Error::new(io::ErrorKind::Other, "second"),
        });

        assert_eq!(outcome.successes, 1);
        assert_eq!(outcome.failures, 2);
        assert_eq!(outcome.bytes_copied, 10);
        assert!(outcome.is_complete());

        let last = outcome.last_error.unwrap();
        assert_eq!(last.kind, ErrorKind::Copy);
        assert!(last.message.contains("second"));
    }

    #[test]
    fn test_progress_percentage() {
        let p = CopyProgress {
            copied: 1,
            total: 4,
            current: None,
        };
        assert_eq!(p.percentage(), 25);

        let empty = CopyProgress {
            copied: 0,
            total: 0,
            current: None,
        };
        assert_eq!(empty.percentage(), 0);
    }
}
