//! Failure reporting for handled events.
//!
//! Handlers never surface errors to Slack users. Instead the receiver hands
//! every failed event to a [`FailureReporter`], which is the operator-facing
//! record of what went wrong.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::error;

use crate::AppError;

/// Category of inbound event a failure belongs to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Slash command invocation.
    Command,
    /// Modal submission.
    ViewSubmission,
    /// Approve or reject button click.
    BlockAction,
    /// Request rejected before reaching a handler.
    Request,
}

impl EventKind {
    /// Snake-case label used in logs and counters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::ViewSubmission => "view_submission",
            Self::BlockAction => "block_action",
            Self::Request => "request",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives every failure produced while handling an inbound event.
pub trait FailureReporter: Send + Sync {
    /// Record one failed event.
    fn report(&self, kind: EventKind, err: &AppError);

    /// Failure counts keyed by `{event kind}.{error kind}`.
    fn snapshot(&self) -> BTreeMap<String, u64>;
}

/// Default reporter: logs each failure and keeps in-process counters.
#[derive(Debug, Default)]
pub struct TracingReporter {
    counts: Mutex<BTreeMap<String, u64>>,
}

impl TracingReporter {
    /// Create a reporter with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FailureReporter for TracingReporter {
    fn report(&self, kind: EventKind, err: &AppError) {
        error!(event_kind = %kind, error_kind = err.kind(), %err, "event handling failed");
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts
            .entry(format!("{kind}.{}", err.kind()))
            .or_insert(0) += 1;
    }

    fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
