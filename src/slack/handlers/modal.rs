//! Modal submission handler for the approval request form.
//!
//! Reads the approver and text from
//! `view.state.values[approver_block][approver].selected_user` and
//! `view.state.values[text_block][approval_text].value`, then sends the
//! approver a message with Approve / Reject buttons.

use slack_morphism::prelude::SlackChannelId;
use tracing::info;

use crate::models::approval::ApprovalRequest;
use crate::models::button::ButtonPayload;
use crate::slack::ack::Ack;
use crate::slack::blocks::{
    self, APPROVAL_CALLBACK_ID, APPROVER_ACTION_ID, APPROVER_BLOCK_ID, TEXT_ACTION_ID,
    TEXT_BLOCK_ID,
};
use crate::slack::client::SlackMessage;
use crate::slack::events::ViewSubmission;
use crate::state::AppState;
use crate::{AppError, Result};

/// Acknowledge the submission (closing the modal), then message the approver.
///
/// Submissions of other modals are acknowledged and ignored.
///
/// # Errors
///
/// Returns `AppError::Payload` if the approver or text is missing,
/// `AppError::Codec` if a button value cannot be built, and
/// `AppError::Slack` if the message cannot be posted.
pub async fn handle_view_submission(
    submission: &ViewSubmission,
    ack: Ack,
    state: &AppState,
) -> Result<()> {
    ack.send();

    if submission.view.callback_id != APPROVAL_CALLBACK_ID {
        info!(
            callback_id = submission.view.callback_id,
            "ignoring submission of unrelated modal"
        );
        return Ok(());
    }

    let request = approval_request_from(submission)?;

    info!(
        request_id = request.id,
        requester_id = request.requester_id,
        approver_id = request.approver_id,
        text_len = request.text.len(),
        "approval request submitted"
    );

    let approve_value = ButtonPayload::approve(&request).encode()?;
    let reject_value = ButtonPayload::reject(&request).encode()?;

    let message = SlackMessage::with_blocks(
        SlackChannelId(request.approver_id.clone()),
        blocks::approval_request_text(&request.requester_id),
        blocks::approval_request_blocks(&request, &approve_value, &reject_value),
    );

    state.platform.post_message(message).await?;

    info!(request_id = request.id, "approval request message sent");
    Ok(())
}

/// Build an [`ApprovalRequest`] from the submitted form values.
///
/// # Errors
///
/// Returns `AppError::Payload` if the approver or text is absent.
pub fn approval_request_from(submission: &ViewSubmission) -> Result<ApprovalRequest> {
    let approver = submission
        .selected_user(APPROVER_BLOCK_ID, APPROVER_ACTION_ID)
        .ok_or_else(|| AppError::Payload("submission has no selected approver".into()))?;
    let text = submission
        .input_value(TEXT_BLOCK_ID, TEXT_ACTION_ID)
        .ok_or_else(|| AppError::Payload("submission has no approval text".into()))?;

    Ok(ApprovalRequest::new(
        submission.user.id.clone(),
        approver.to_owned(),
        text.to_owned(),
    ))
}
