/*!
 * Integration test for running copies on the background worker
 */

use std::fs;
use std::sync::mpsc;

use tempfile::tempdir;

use extcopy::{spawn, ChannelReporter, Config, ErrorKind, ProgressEvent, RunSummary};

#[test]
fn test_worker_streams_progress_to_another_thread() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    fs::create_dir_all(src.path().join("a").join("b")).unwrap();
    fs::write(src.path().join("one.csv"), "1").unwrap();
    fs::write(src.path().join("a").join("one.csv"), "2").unwrap();
    fs::write(src.path().join("a").join("b").join("two.CSV"), "3").unwrap();
    fs::write(src.path().join("a").join("skip.txt"), "4").unwrap();

    let (tx, rx) = mpsc::channel();
    let job = spawn(
        Config::new("csv", src.path(), dst.path().join("flat")),
        ChannelReporter::new(tx),
    )
    .unwrap();

    // The receiving side owns its own view of the progress
    let mut last_copied = 0;
    let mut total = None;
    for event in rx {
        match event {
            ProgressEvent::Started { total: t } => total = Some(t),
            ProgressEvent::Progress(p) => {
                assert_eq!(p.copied, last_copied + 1);
                last_copied = p.copied;
            }
            ProgressEvent::Finished(outcome) => {
                assert_eq!(outcome.successes, last_copied);
            }
        }
    }

    let result = job.join();
    assert_eq!(total, Some(3));
    assert_eq!(last_copied, 3);
    assert_eq!(
        RunSummary::from_result(&result),
        RunSummary::AllSucceeded { count: 3 }
    );

    let flat = dst.path().join("flat");
    assert!(flat.join("one.csv").exists());
    assert!(flat.join("one_1.csv").exists());
    assert!(flat.join("two.CSV").exists());
    assert!(!flat.join("skip.txt").exists());
}

#[test]
fn test_worker_reports_missing_source() {
    let dir = tempdir().unwrap();
    let job = spawn(
        Config::new("csv", dir.path().join("missing"), dir.path().join("out")),
        |_: &extcopy::CopyProgress| {},
    )
    .unwrap();

    let result = job.join();
    let summary = RunSummary::from_result(&result);
    assert!(matches!(summary, RunSummary::Fatal { .. }));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Access);
}
