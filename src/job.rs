/*!
 * Orchestration of a find-and-copy run on a background worker
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::Config;
use crate::copier::Copier;
use crate::error::{ExtCopyError, Result};
use crate::finder::Finder;
use crate::progress::ProgressReporter;
use crate::types::CopyOutcome;

/// Scoped access to the source and destination of a run
///
/// Acquired before discovery and released when dropped, which happens on
/// every exit path of [`run`].
#[derive(Debug)]
pub struct AccessGuard {
    source: PathBuf,
    destination: PathBuf,
}

impl AccessGuard {
    /// Check that the source can be listed and the destination, if it
    /// already exists, is a writable directory
    pub fn acquire(source: &Path, destination: &Path) -> Result<Self> {
        fs::read_dir(source).map_err(|e| ExtCopyError::access(source, e))?;

        match fs::metadata(destination) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(ExtCopyError::access(
                    destination,
                    io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
                ));
            }
            // Mode bits and mount flags both decide writability, so try a write
            Ok(_) => {
                NamedTempFile::new_in(destination)
                    .map_err(|e| ExtCopyError::access(destination, e))?;
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(ExtCopyError::access(destination, e));
            }
            // Missing destinations are created, or rejected, by the copier
            _ => {}
        }

        debug!(
            "Acquired access to {} and {}",
            source.display(),
            destination.display()
        );
        Ok(Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        })
    }

    /// Source directory the guard was acquired for
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination directory, which may not exist yet
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

impl Drop for AccessGuard {
    fn drop(&mut self) {
        debug!(
            "Released access to {} and {}",
            self.source.display(),
            self.destination.display()
        );
    }
}

/// Find and copy everything described by `config` on the current thread
///
/// Fatal setup errors are returned before any file is copied. Per-file
/// failures end up in the returned outcome.
pub fn run(config: &Config, reporter: &dyn ProgressReporter) -> Result<CopyOutcome> {
    config.validate()?;

    let guard = AccessGuard::acquire(&config.source_dir, &config.destination_dir)?;

    let copier = Copier::new(guard.destination()).preserve_metadata(config.preserve_metadata);
    copier.ensure_destination()?;

    let finder = Finder::new(&config.extension);
    info!(
        "Searching {} for .{} files",
        guard.source().display(),
        finder.extension()
    );
    let matches = finder.find(guard.source())?;
    info!(
        "Found {} files to copy into {}",
        matches.len(),
        copier.destination().display()
    );

    copier.copy(&matches, reporter)
}

/// A run executing on its own worker thread
#[derive(Debug)]
pub struct CopyJob {
    handle: JoinHandle<Result<CopyOutcome>>,
}

impl CopyJob {
    /// Whether the worker has finished
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its result
    pub fn join(self) -> Result<CopyOutcome> {
        self.handle
            .join()
            .map_err(|_| ExtCopyError::Worker("copy worker panicked".to_string()))?
    }
}

/// Start [`run`] on a single background thread
pub fn spawn<R>(config: Config, reporter: R) -> Result<CopyJob>
where
    R: ProgressReporter + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("extcopy-worker".to_string())
        .spawn(move || run(&config, &reporter))
        .map_err(|e| ExtCopyError::Worker(format!("failed to start copy worker: {}", e)))?;

    Ok(CopyJob { handle })
}
