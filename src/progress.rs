/*!
 * Progress reporting for copy runs
 */

use std::sync::mpsc::Sender;

use indicatif::ProgressBar;

use crate::types::{CopyOutcome, CopyProgress};
use crate::utils::display_name;

/// Trait for receiving progress from a copy run
///
/// Implementations are called from the worker thread and must return quickly.
pub trait ProgressReporter {
    /// Called once discovery has finished, before the first copy
    fn started(&self, _total: usize) {}

    /// Called after every successful copy
    fn report(&self, progress: &CopyProgress);

    /// Called once with the terminal outcome
    fn finished(&self, _outcome: &CopyOutcome) {}
}

// Implement ProgressReporter for closures
impl<F> ProgressReporter for F
where
    F: Fn(&CopyProgress),
{
    fn report(&self, progress: &CopyProgress) {
        self(progress)
    }
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _progress: &CopyProgress) {}
}

/// Drives an indicatif progress bar
#[derive(Debug, Clone)]
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    /// Wrap a progress bar
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressReporter for BarReporter {
    fn started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_prefix("📦 Copying");
        self.bar
            .set_message(format!("🔎 Found {} files to copy", total));
    }

    fn report(&self, progress: &CopyProgress) {
        self.bar.set_position(progress.copied as u64);

        if let Some(name) = progress.current.as_ref().and_then(|p| p.file_name()) {
            let name = display_name(&name.to_string_lossy(), 40);
            self.bar.set_message(format!(
                "Current file: {} ({}%)",
                name,
                progress.percentage()
            ));
        }
    }

    fn finished(&self, outcome: &CopyOutcome) {
        self.bar.set_position(outcome.attempted() as u64);
        self.bar.finish_and_clear();
    }
}

/// Event sent through a channel by [`ChannelReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Discovery finished with this many matches
    Started { total: usize },
    /// A file was copied
    Progress(CopyProgress),
    /// The run is over
    Finished(CopyOutcome),
}

/// Forwards progress snapshots to a channel so another thread owns the state
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<ProgressEvent>,
}

impl ChannelReporter {
    /// Send events through `sender`
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

// A dropped receiver only means nobody is listening anymore
impl ProgressReporter for ChannelReporter {
    fn started(&self, total: usize) {
        let _ = self.sender.send(ProgressEvent::Started { total });
    }

    fn report(&self, progress: &CopyProgress) {
        let _ = self.sender.send(ProgressEvent::Progress(progress.clone()));
    }

    fn finished(&self, outcome: &CopyOutcome) {
        let _ = self.sender.send(ProgressEvent::Finished(outcome.clone()));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::sync::mpsc;

    use super::*;

    fn snapshot(copied: usize, total: usize) -> CopyProgress {
        CopyProgress {
            copied,
            total,
            current: None,
        }
    }

    #[test]
    fn test_closure_reporter() {
        let seen = RefCell::new(Vec::new());
        let reporter = |p: &CopyProgress| seen.borrow_mut().push((p.copied, p.total));

        reporter.started(2);
        reporter.report(&snapshot(1, 2));
        reporter.report(&snapshot(2, 2));
        reporter.finished(&CopyOutcome::new(2));

        assert_eq!(seen.into_inner(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_channel_reporter_event_order() {
        let (tx, rx) = mpsc::channel();
        let reporter = ChannelReporter::new(tx);

        reporter.started(1);
        reporter.report(&snapshot(1, 1));
        reporter.finished(&CopyOutcome::new(1));
        drop(reporter);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                ProgressEvent::Started { total: 1 },
                ProgressEvent::Progress(snapshot(1, 1)),
                ProgressEvent::Finished(CopyOutcome::new(1)),
            ]
        );
    }

    #[test]
    fn test_channel_reporter_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let reporter = ChannelReporter::new(tx);
        reporter.report(&snapshot(1, 1));
    }

    #[test]
    fn test_bar_reporter_tracks_position() {
        let bar = ProgressBar::hidden();
        let reporter = BarReporter::new(bar.clone());

        reporter.started(3);
        assert_eq!(bar.length(), Some(3));
        reporter.report(&snapshot(2, 3));
        assert_eq!(bar.position(), 2);

        reporter.report(&CopyProgress {
            copied: 3,
            total: 3,
            current: Some(PathBuf::from("/dst/c.jpg")),
        });
        assert_eq!(bar.message(), "Current file: c.jpg (100%)");
    }
}
