//! One-shot acknowledgment token.
//!
//! Slack requires every command and interaction to be acknowledged within a
//! few seconds, independent of any follow-up work. The receiver hands each
//! handler an [`Ack`] and answers the HTTP request as soon as it fires.
//! Sending consumes the token, so an event is acknowledged at most once.

use tokio::sync::oneshot;
use tracing::warn;

/// Acknowledgment handle passed to exactly one handler invocation.
#[derive(Debug)]
#[must_use = "an event that is never acknowledged makes Slack show an error"]
pub struct Ack {
    tx: oneshot::Sender<()>,
}

impl Ack {
    /// Create a token and the receiver that observes it.
    pub fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Acknowledge the event.
    pub fn send(self) {
        if self.tx.send(()).is_err() {
            warn!("acknowledgment receiver already dropped");
        }
    }
}
