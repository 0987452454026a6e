//! Slash command handler: opens the approval request modal.

use slack_morphism::prelude::SlackTriggerId;
use tracing::{info, warn};

use crate::slack::ack::Ack;
use crate::slack::blocks;
use crate::slack::events::CommandPayload;
use crate::state::AppState;
use crate::{AppError, Result};

/// Acknowledge the command, then open the "Request Approval" modal.
///
/// # Errors
///
/// Returns `AppError::Payload` for a command other than the configured one,
/// and `AppError::Slack` if the modal cannot be opened.
pub async fn handle_command(command: &CommandPayload, ack: Ack, state: &AppState) -> Result<()> {
    ack.send();

    if command.command != state.config.slash_command {
        warn!(command = command.command, "unexpected slash command");
        return Err(AppError::Payload(format!(
            "unknown slash command {}",
            command.command
        )));
    }

    info!(user_id = command.user_id, "opening approval request modal");

    state
        .platform
        .open_modal(
            SlackTriggerId(command.trigger_id.clone()),
            blocks::approval_request_modal(),
        )
        .await
}
