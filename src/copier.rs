/*!
 * Collision-safe copying into a flat destination directory
 */

use std::ffi::{OsStr, OsString};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::{debug, error, info, warn};

use crate::error::{ExtCopyError, Result};
use crate::progress::ProgressReporter;
use crate::types::{CopyOutcome, CopyPlan, CopyProgress, FileMatch};

/// Copies matched files into one directory without ever overwriting
pub struct Copier {
    /// Flat output directory
    destination: PathBuf,
    /// Copy permissions and file times along with content
    preserve_metadata: bool,
}

impl Copier {
    /// Create a copier writing into `destination`
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            preserve_metadata: true,
        }
    }

    /// Enable or disable permission and timestamp preservation
    pub fn preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }

    /// The output directory
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Create the destination directory and any missing parents
    pub fn ensure_destination(&self) -> Result<()> {
        if self.destination.is_dir() {
            return Ok(());
        }

        info!("Creating destination directory {}", self.destination.display());
        fs::create_dir_all(&self.destination).map_err(|source| ExtCopyError::DirectoryCreation {
            path: self.destination.clone(),
            source,
        })
    }

    /// Pair a match with its collision-free destination
    pub fn plan(&self, file: &FileMatch) -> CopyPlan {
        CopyPlan {
            file: file.clone(),
            destination: resolve_destination(&self.destination, file),
        }
    }

    /// Copy every match, one at a time
    ///
    /// Only a failure to create the destination aborts the run. Failures of
    /// single files are counted and the batch continues.
    pub fn copy(
        &self,
        matches: &[FileMatch],
        reporter: &dyn ProgressReporter,
    ) -> Result<CopyOutcome> {
        self.ensure_destination()?;

        let total = matches.len();
        let mut outcome = CopyOutcome::new(total);
        reporter.started(total);

        for file in matches {
            let plan = self.plan(file);

            match self.copy_file(&plan) {
                Ok(bytes) => {
                    debug!(
                        "Copied {} -> {}",
                        plan.file.path.display(),
                        plan.destination.display()
                    );
                    outcome.record_success(bytes);
                    reporter.report(&CopyProgress {
                        copied: outcome.successes,
                        total,
                        current: Some(plan.destination),
                    });
                }
                Err(e) => {
                    error!("{}", e);
                    outcome.record_failure(&e);
                }
            }
        }

        info!(
            "Copied {} of {} files ({} failed)",
            outcome.successes, outcome.total, outcome.failures
        );
        reporter.finished(&outcome);
        Ok(outcome)
    }

    /// Duplicate one file, returning the number of bytes written
    fn copy_file(&self, plan: &CopyPlan) -> Result<u64> {
        let copy_error = |source: io::Error| ExtCopyError::Copy {
            from: plan.file.path.clone(),
            to: plan.destination.clone(),
            source,
        };

        let mut input = File::open(&plan.file.path).map_err(copy_error)?;
        let metadata = input.metadata().map_err(copy_error)?;

        // create_new refuses to replace a file that appeared after planning
        let mut output = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&plan.destination)
            .map_err(copy_error)?;

        let written = io::copy(&mut input, &mut output).and_then(|n| output.sync_all().map(|_| n));
        drop(output);

        let bytes = match written {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&plan.destination) {
                    warn!(
                        "Failed to remove partial copy {}: {}",
                        plan.destination.display(),
                        cleanup
                    );
                }
                return Err(copy_error(e));
            }
        };

        if self.preserve_metadata {
            if let Err(e) = apply_metadata(&metadata, &plan.destination) {
                warn!(
                    "Copied {} but could not preserve metadata: {}",
                    plan.destination.display(),
                    e
                );
            }
        }

        Ok(bytes)
    }
}

/// Find a free name for `file` inside `dest_dir`
///
/// Tries the original name first, then `{stem}_1.{ext}`, `{stem}_2.{ext}`
/// and so on. The extension keeps its original case.
pub fn resolve_destination(dest_dir: &Path, file: &FileMatch) -> PathBuf {
    let mut candidate = dest_dir.join(&file.base_name);
    if !entry_exists(&candidate) {
        return candidate;
    }

    let name = Path::new(&file.base_name);
    let stem = name.file_stem().unwrap_or(file.base_name.as_os_str());
    let ext = name
        .extension()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from(&file.extension));

    let mut counter: usize = 1;
    while entry_exists(&candidate) {
        let mut numbered = stem.to_os_string();
        numbered.push(format!("_{}.", counter));
        numbered.push(&ext);
        candidate = dest_dir.join(numbered);
        counter += 1;
    }

    candidate
}

/// Any entry counts, including dangling symlinks
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Copy file times and permissions from the source
fn apply_metadata(source: &Metadata, destination: &Path) -> io::Result<()> {
    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(source),
        FileTime::from_last_modification_time(source),
    )?;
    fs::set_permissions(destination, source.permissions())
}
