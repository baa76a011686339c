/*!
 * Configuration handling for extcopy
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::{ExtCopyError, Result};
use crate::report::ReportFormat;
use crate::{bail, ensure};

/// Command-line arguments for extcopy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "extcopy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy every file with a given extension from a directory tree into one flat directory",
    long_about = "Recursively searches the source directory for regular, non-hidden files whose extension matches (case-insensitively) and copies them into the destination directory. Name collisions are resolved by appending _1, _2, ... to the file stem; existing files are never overwritten."
)]
pub struct Args {
    /// File extension to collect, e.g. jpg (a leading dot is ignored)
    #[clap(required_unless_present = "generate")]
    pub extension: Option<String>,

    /// Directory to search recursively
    #[clap(required_unless_present = "generate")]
    pub source: Option<String>,

    /// Flat directory to copy matches into (created if missing)
    #[clap(required_unless_present = "generate")]
    pub destination: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, default_value = "info")]
    pub log_level: String,

    /// Do not copy permissions and timestamps
    #[clap(long)]
    pub no_preserve_metadata: bool,

    /// Format of the final report
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub format: ReportFormat,

    /// Hide the progress bar
    #[clap(long, short)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Normalized extension: lowercase, no leading dot
    pub extension: String,

    /// Directory searched for matches
    pub source_dir: PathBuf,

    /// Flat output directory
    pub destination_dir: PathBuf,

    /// Copy permissions and file times along with content
    pub preserve_metadata: bool,

    /// Report format
    pub format: ReportFormat,

    /// Show the progress bar
    pub show_progress: bool,

    /// Log level directive handed to the subscriber
    pub log_level: String,
}

impl Config {
    /// Create a configuration with default options
    pub fn new(
        extension: impl AsRef<str>,
        source_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extension: normalize_extension(extension.as_ref()),
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
            preserve_metadata: true,
            format: ReportFormat::default(),
            show_progress: true,
            log_level: "info".to_string(),
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let (Some(extension), Some(source), Some(destination)) =
            (args.extension, args.source, args.destination)
        else {
            bail!(
                InvalidArgument,
                "extension, source and destination are all required"
            );
        };

        let mut config = Self::new(extension, source, destination);
        config.preserve_metadata = !args.no_preserve_metadata;
        config.format = args.format;
        config.show_progress = !args.quiet;
        config.log_level = args.log_level;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.extension.is_empty(),
            Config,
            "File extension must not be empty"
        );
        ensure!(
            !self.extension.contains(|c| matches!(c, '/' | '\\' | '.')),
            Config,
            "Invalid file extension: {}",
            self.extension
        );
        ensure!(
            !self.source_dir.as_os_str().is_empty(),
            Config,
            "Source directory must not be empty"
        );
        ensure!(
            !self.destination_dir.as_os_str().is_empty(),
            Config,
            "Destination directory must not be empty"
        );

        // A missing source must stop the run before discovery starts
        let metadata = std::fs::metadata(&self.source_dir)
            .map_err(|e| ExtCopyError::access(&self.source_dir, e))?;
        if !metadata.is_dir() {
            return Err(ExtCopyError::access(
                &self.source_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        if self.destination_dir.exists() && !self.destination_dir.is_dir() {
            return Err(ExtCopyError::access(
                &self.destination_dir,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"),
            ));
        }

        Ok(())
    }
}

/// Normalize a user-supplied extension: trimmed, one leading dot removed, lowercase
pub fn normalize_extension(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('.')
        .unwrap_or(trimmed)
        .to_lowercase()
}
