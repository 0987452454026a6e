//! Approve / Reject button handler.
//!
//! Decodes the requester from the clicked button's value and notifies them
//! of the decision. Nothing is recorded; clicking again notifies again.

use slack_morphism::prelude::SlackChannelId;
use tracing::{info, warn};

use crate::models::approval::Decision;
use crate::models::button::ButtonPayload;
use crate::slack::ack::Ack;
use crate::slack::blocks;
use crate::slack::client::SlackMessage;
use crate::slack::events::BlockActions;
use crate::state::AppState;
use crate::{AppError, Result};

/// Acknowledge a block action, then notify the requester of the decision.
///
/// Actions other than `approve` / `reject` are acknowledged and ignored.
///
/// # Errors
///
/// Returns `AppError::Codec` if the button value cannot be decoded and
/// `AppError::Slack` if the notification cannot be posted.
pub async fn handle_block_actions(
    event: &BlockActions,
    ack: Ack,
    state: &AppState,
) -> Result<()> {
    ack.send();

    let Some(action) = event.actions.first() else {
        warn!(user_id = event.user.id, "block action without actions");
        return Ok(());
    };

    let Some(decision) = Decision::from_action_id(&action.action_id) else {
        info!(action_id = action.action_id, "ignoring unrelated block action");
        return Ok(());
    };

    let value = action
        .value
        .as_deref()
        .ok_or_else(|| AppError::Codec(format!("{} button has no value", decision.action_id())))?;
    let payload = ButtonPayload::decode(value)?;

    notify_requester(decision, &payload, &event.user.id, state).await
}

/// Send the requester a direct notification of `decision` by `approver_id`.
///
/// # Errors
///
/// Returns `AppError::Slack` if the message cannot be posted.
pub async fn notify_requester(
    decision: Decision,
    payload: &ButtonPayload,
    approver_id: &str,
    state: &AppState,
) -> Result<()> {
    let notice = blocks::decision_notice(decision, approver_id, payload.text.as_deref());
    let message = SlackMessage::plain(SlackChannelId(payload.requester.clone()), notice);

    state.platform.post_message(message).await?;

    info!(
        request_id = payload.id.as_deref().unwrap_or("unknown"),
        requester_id = payload.requester,
        approver_id,
        ?decision,
        "requester notified of decision"
    );
    Ok(())
}
