/*!
 * extcopy - collect every file of one extension into a flat directory
 *
 * This library walks a source tree for regular, non-hidden files whose
 * extension matches case-insensitively, then copies them one at a time into
 * a destination directory. Name collisions get a numeric `_N` suffix so no
 * existing file is ever overwritten.
 */

pub mod config;
pub mod copier;
pub mod error;
pub mod finder;
pub mod job;
pub mod progress;
pub mod report;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use config::Config;
pub use copier::{resolve_destination, Copier};
pub use error::{ErrorKind, ExtCopyError, Result};
pub use finder::Finder;
pub use job::{run, spawn, AccessGuard, CopyJob};
pub use progress::{BarReporter, ChannelReporter, NoProgress, ProgressEvent, ProgressReporter};
pub use report::{ReportFormat, Reporter, RunReport, RunSummary};
pub use types::{CopyOutcome, CopyPlan, CopyProgress, FileMatch, LastError};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
