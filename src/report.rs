/*!
 * Reporting functionality for extcopy
 *
 * Turns the result of a run into a user-facing summary, rendered either as a
 * console table (tabled) or as JSON.
 */

use std::fmt;
use std::time::Duration;

use chrono::Local;
use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::types::{CopyOutcome, LastError};
use crate::utils::format_file_size;

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunSummary {
    /// No matching files were found
    NothingToCopy,
    /// Every found file was copied
    AllSucceeded { count: usize },
    /// Some files failed; only the last error is kept
    Partial {
        successes: usize,
        failures: usize,
        last_error: Option<LastError>,
    },
    /// The run aborted before copying anything
    Fatal { reason: String },
}

impl RunSummary {
    /// Classify a finished outcome
    pub fn from_outcome(outcome: &CopyOutcome) -> Self {
        if outcome.is_empty() {
            Self::NothingToCopy
        } else if outcome.failures == 0 {
            Self::AllSucceeded {
                count: outcome.successes,
            }
        } else {
            Self::Partial {
                successes: outcome.successes,
                failures: outcome.failures,
                last_error: outcome.last_error.clone(),
            }
        }
    }

    /// Classify the result of `job::run`
    pub fn from_result(result: &Result<CopyOutcome>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(e) => Self::Fatal {
                reason: e.to_string(),
            },
        }
    }

    /// Nothing failed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::NothingToCopy | Self::AllSucceeded { .. })
    }

    /// Process exit code for this summary
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NothingToCopy | Self::AllSucceeded { .. } => 0,
            Self::Partial { .. } => 1,
            Self::Fatal { .. } => 2,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToCopy => write!(f, "0 files found, nothing to copy"),
            Self::AllSucceeded { count } => {
                write!(f, "All {} files were copied successfully", count)
            }
            Self::Partial {
                successes,
                failures,
                last_error,
            } => {
                let detail = last_error
                    .as_ref()
                    .map(|e| e.message.as_str())
                    .unwrap_or("unknown error");
                write!(
                    f,
                    "{} files copied, {} files could not be copied; last error: {}",
                    successes, failures, detail
                )
            }
            Self::Fatal { reason } => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Everything shown to the user at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Terminal state
    pub summary: RunSummary,
    /// Final counts, absent after a fatal error
    pub outcome: Option<CopyOutcome>,
    /// Extension that was searched for
    pub extension: String,
    /// Destination directory
    pub destination: String,
    /// Wall-clock time of the run in seconds
    pub elapsed_secs: f64,
    /// When the report was produced (RFC 3339)
    pub finished_at: String,
}

impl RunReport {
    /// Build a report from the result of a run
    pub fn new(
        result: &Result<CopyOutcome>,
        extension: &str,
        destination: &str,
        duration: Duration,
    ) -> Self {
        Self {
            summary: RunSummary::from_result(result),
            outcome: result.as_ref().ok().cloned(),
            extension: extension.to_string(),
            destination: destination.to_string(),
            elapsed_secs: duration.as_secs_f64(),
            finished_at: Local::now().to_rfc3339(),
        }
    }
}

/// Format of the report output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Console table output
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.generate_console_report(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) -> Result<()> {
        println!("\n{}", self.generate_report(report)?);
        Ok(())
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "🔎 Extension".to_string(),
                value: format!(".{}", report.extension),
            },
            SummaryRow {
                key: "📂 Destination".to_string(),
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", Duration::from_secs_f64(report.elapsed_secs)),
            },
        ];

        if let Some(outcome) = &report.outcome {
            rows.push(SummaryRow {
                key: "📄 Files Found".to_string(),
                value: self.format_number(outcome.total),
            });
            rows.push(SummaryRow {
                key: "✅ Copied".to_string(),
                value: self.format_number(outcome.successes),
            });
            rows.push(SummaryRow {
                key: "❌ Failed".to_string(),
                value: self.format_number(outcome.failures),
            });
            rows.push(SummaryRow {
                key: "📦 Data Written".to_string(),
                value: format_file_size(outcome.bytes_copied),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &RunReport) -> String {
        let title = match &report.summary {
            RunSummary::NothingToCopy => "ℹ️  NOTHING TO COPY",
            RunSummary::AllSucceeded { .. } => "✅  COPY COMPLETE",
            RunSummary::Partial { .. } => "⚠️  COPY FINISHED WITH ERRORS",
            RunSummary::Fatal { .. } => "❌  COPY ABORTED",
        };

        format!(
            "{}\n{}\n{}",
            title,
            self.create_summary_table(report),
            report.summary
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use super::*;
    use crate::error::{ErrorKind, ExtCopyError};

    fn partial_outcome() -> CopyOutcome {
        let mut outcome = CopyOutcome::new(3);
        outcome.record_success(100);
        outcome.record_success(100);
        outcome.record_failure(&ExtCopyError::Copy {
            from: PathBuf::from("/src/c.jpg"),
            to: PathBuf::from("/dst/c.jpg"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        });
        outcome
    }

    #[test]
    fn test_summary_classification() {
        assert_eq!(
            RunSummary::from_outcome(&CopyOutcome::new(0)),
            RunSummary::NothingToCopy
        );

        let mut all = CopyOutcome::new(1);
        all.record_success(1);
        assert_eq!(
            RunSummary::from_outcome(&all),
            RunSummary::AllSucceeded { count: 1 }
        );

        match RunSummary::from_outcome(&partial_outcome()) {
            RunSummary::Partial {
                successes,
                failures,
                last_error: Some(last),
            } => {
                assert_eq!((successes, failures), (2, 1));
                assert_eq!(last.kind, ErrorKind::Copy);
            }
            other => panic!("unexpected summary: {:?}", other),
        }

        let fatal: Result<CopyOutcome> = Err(ExtCopyError::Config("empty".to_string()));
        let summary = RunSummary::from_result(&fatal);
        assert!(matches!(summary, RunSummary::Fatal { .. }));
        assert_eq!(summary.exit_code(), 2);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_summary_messages() {
        assert_eq!(
            RunSummary::NothingToCopy.to_string(),
            "0 files found, nothing to copy"
        );
        let partial = RunSummary::from_outcome(&partial_outcome()).to_string();
        assert!(partial.starts_with("2 files copied, 1 files could not be copied"));
        assert!(partial.contains("disk full"));
    }

    #[test]
    fn test_console_report() {
        let report = RunReport::new(
            &Ok(partial_outcome()),
            "jpg",
            "/dst",
            Duration::from_millis(5),
        );
        let text = Reporter::new(ReportFormat::Table)
            .generate_report(&report)
            .unwrap();

        assert!(text.contains("COPY FINISHED WITH ERRORS"));
        assert!(text.contains(".jpg"));
        assert!(text.contains("200 bytes"));
    }

    #[test]
    fn test_json_report() {
        let report = RunReport::new(&Ok(CopyOutcome::new(0)), "jpg", "/dst", Duration::ZERO);
        let json = Reporter::new(ReportFormat::Json)
            .generate_report(&report)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["status"], "nothing_to_copy");
        assert_eq!(value["outcome"]["total"], 0);
        assert_eq!(value["extension"], "jpg");
    }
}
