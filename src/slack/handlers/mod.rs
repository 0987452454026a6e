//! Approval workflow handlers.
//!
//! Each handler acknowledges its event first, then makes at most one
//! outbound call. Errors are returned to the caller for reporting; nothing
//! is shown to the Slack user.

pub mod approval;
pub mod command;
pub mod modal;

use tracing::info;

use crate::slack::ack::Ack;
use crate::slack::events::{InboundEvent, InteractionPayload};
use crate::state::AppState;
use crate::Result;

/// Route an inbound event to its handler.
///
/// # Errors
///
/// Propagates the handler's error after the event has been acknowledged.
pub async fn dispatch(event: InboundEvent, ack: Ack, state: &AppState) -> Result<()> {
    match event {
        InboundEvent::Command(command) => command::handle_command(&command, ack, state).await,
        InboundEvent::Interaction(InteractionPayload::ViewSubmission(submission)) => {
            modal::handle_view_submission(&submission, ack, state).await
        }
        InboundEvent::Interaction(InteractionPayload::BlockActions(actions)) => {
            approval::handle_block_actions(&actions, ack, state).await
        }
        InboundEvent::Interaction(InteractionPayload::Other) => {
            ack.send();
            info!("unhandled interaction type acknowledged");
            Ok(())
        }
    }
}
