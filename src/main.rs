/*!
 * Command-line interface for extcopy
 */

use std::io;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use extcopy::config::{Args, Config};
use extcopy::job;
use extcopy::progress::BarReporter;
use extcopy::report::{Reporter, RunReport};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "extcopy", &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_args(args)?;
    initialize_logging(&config.log_level)?;

    let progress = create_progress_bar(&config);
    let start_time = Instant::now();

    // All filesystem work happens on one worker thread; this thread only
    // renders what the reporter pushes into the bar
    let result = job::spawn(config.clone(), BarReporter::new(progress.clone()))
        .and_then(|handle| handle.join());

    progress.finish_and_clear();

    let report = RunReport::new(
        &result,
        &config.extension,
        &config.destination_dir.display().to_string(),
        start_time.elapsed(),
    );
    Reporter::new(config.format).print_report(&report)?;

    std::process::exit(report.summary.exit_code());
}

/// Progress bar for the run, hidden with --quiet
fn create_progress_bar(config: &Config) -> ProgressBar {
    if !config.show_progress {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}  Remaining: {eta_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Setup");
    progress.set_message(format!(
        "📂 Searching {} for .{} files",
        config.source_dir.display(),
        config.extension
    ));
    progress
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> io::Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
