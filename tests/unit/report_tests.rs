//! Unit tests for the tracing failure reporter.

use approval_relay::report::{EventKind, FailureReporter, TracingReporter};
use approval_relay::AppError;

#[test]
fn new_reporter_is_empty() {
    assert!(TracingReporter::new().snapshot().is_empty());
}

#[test]
fn counts_by_event_and_error_kind() {
    let reporter = TracingReporter::new();
    reporter.report(EventKind::Command, &AppError::Slack("views.open failed".into()));
    reporter.report(EventKind::Command, &AppError::Slack("views.open failed".into()));
    reporter.report(EventKind::BlockAction, &AppError::Codec("bad value".into()));

    let snapshot = reporter.snapshot();
    assert_eq!(snapshot.get("command.slack"), Some(&2));
    assert_eq!(snapshot.get("block_action.codec"), Some(&1));
    assert_eq!(snapshot.len(), 2);
}

#[test]
fn event_kind_labels() {
    assert_eq!(EventKind::ViewSubmission.to_string(), "view_submission");
    assert_eq!(
        serde_json::to_string(&EventKind::BlockAction).expect("serialise"),
        "\"block_action\""
    );
}

#[test]
fn concurrent_reports_are_all_counted() {
    let reporter = std::sync::Arc::new(TracingReporter::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reporter = std::sync::Arc::clone(&reporter);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    reporter.report(EventKind::ViewSubmission, &AppError::Slack("post".into()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("reporter thread");
    }

    assert_eq!(reporter.snapshot().get("view_submission.slack"), Some(&400));
}
