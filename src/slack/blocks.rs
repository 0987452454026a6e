//! Slack Block Kit builders for the approval modal and messages.

use slack_morphism::prelude::{
    SlackActionBlockElement, SlackActionId, SlackActionsBlock, SlackBlock, SlackBlockButtonElement,
    SlackBlockId, SlackBlockPlainTextInputElement, SlackBlockPlainTextOnly, SlackBlockText,
    SlackBlockUsersSelectElement, SlackCallbackId, SlackInputBlock, SlackInputBlockElement,
    SlackModalView, SlackSectionBlock, SlackView,
};

use crate::models::approval::{ApprovalRequest, Decision};

/// `callback_id` of the approval request modal.
pub const APPROVAL_CALLBACK_ID: &str = "approval_request";
/// Block holding the approver picker.
pub const APPROVER_BLOCK_ID: &str = "approver_block";
/// Action ID of the approver picker.
pub const APPROVER_ACTION_ID: &str = "approver";
/// Block holding the approval text input.
pub const TEXT_BLOCK_ID: &str = "text_block";
/// Action ID of the approval text input.
pub const TEXT_ACTION_ID: &str = "approval_text";

/// Slack's limit on section block text, in characters.
pub const MAX_SECTION_CHARS: usize = 3000;

const REQUEST_HEADING: &str = "*Approval Request*\n\n";

/// Longest approval text the modal accepts; the heading plus the text must
/// fit in one section block.
pub const MAX_APPROVAL_TEXT_CHARS: usize = MAX_SECTION_CHARS - REQUEST_HEADING.len();

/// A single action button.
pub struct Button<'a> {
    /// Identifier Slack reports back on click.
    pub action_id: &'a str,
    /// Visible button label.
    pub label: &'a str,
    /// Opaque value returned with the click.
    pub value: &'a str,
    /// `primary`, `danger`, or `None` for the default style.
    pub style: Option<&'a str>,
}

/// Build an actions block with the given buttons.
#[must_use]
pub fn action_buttons(block_id: &str, buttons: &[Button<'_>]) -> SlackBlock {
    let elements: Vec<SlackActionBlockElement> = buttons
        .iter()
        .map(|button| {
            let mut element = SlackBlockButtonElement::new(
                button.action_id.into(),
                SlackBlockPlainTextOnly::from(button.label),
            )
            .with_value(button.value.into());
            if let Some(style) = button.style {
                element = element.with_style(style.into());
            }
            SlackActionBlockElement::Button(element)
        })
        .collect();
    SlackBlock::Actions(
        SlackActionsBlock::new(elements).with_block_id(SlackBlockId(block_id.into())),
    )
}

/// Build a markdown section block.
#[must_use]
pub fn text_section(text: &str) -> SlackBlock {
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(text.into())))
}

/// Build the "Request Approval" modal opened by the slash command.
///
/// Both inputs are required; Slack refuses to submit the form until an
/// approver is picked and text is entered.
#[must_use]
pub fn approval_request_modal() -> SlackView {
    let approver_element =
        SlackBlockUsersSelectElement::new(SlackActionId(APPROVER_ACTION_ID.to_owned()))
            .with_placeholder(SlackBlockPlainTextOnly::from("Select an approver"));
    let approver_block = SlackInputBlock::new(
        SlackBlockPlainTextOnly::from("Approver"),
        SlackInputBlockElement::UsersSelect(approver_element),
    )
    .with_block_id(SlackBlockId(APPROVER_BLOCK_ID.to_owned()))
    .with_optional(false);

    let text_element = SlackBlockPlainTextInputElement::new(SlackActionId(TEXT_ACTION_ID.to_owned()))
        .with_multiline(true)
        .with_max_length(MAX_APPROVAL_TEXT_CHARS as u64);
    let text_block = SlackInputBlock::new(
        SlackBlockPlainTextOnly::from("Approval Text"),
        SlackInputBlockElement::PlainTextInput(text_element),
    )
    .with_block_id(SlackBlockId(TEXT_BLOCK_ID.to_owned()))
    .with_optional(false);

    SlackView::Modal(
        SlackModalView::new(
            SlackBlockPlainTextOnly::from("Request Approval"),
            vec![approver_block.into(), text_block.into()],
        )
        .with_callback_id(SlackCallbackId(APPROVAL_CALLBACK_ID.to_owned()))
        .with_submit(SlackBlockPlainTextOnly::from("Submit")),
    )
}

/// Fallback text of the message sent to the approver.
#[must_use]
pub fn approval_request_text(requester_id: &str) -> String {
    format!("You have a new approval request from <@{requester_id}>:")
}

/// Blocks of the message sent to the approver: the request text and the
/// Approve / Reject buttons carrying the encoded values.
#[must_use]
pub fn approval_request_blocks(
    request: &ApprovalRequest,
    approve_value: &str,
    reject_value: &str,
) -> Vec<SlackBlock> {
    vec![
        text_section(&format!("{REQUEST_HEADING}{}", request.text)),
        action_buttons(
            &format!("approval_{}", request.id),
            &[
                Button {
                    action_id: Decision::Approved.action_id(),
                    label: "Approve",
                    value: approve_value,
                    style: Some("primary"),
                },
                Button {
                    action_id: Decision::Rejected.action_id(),
                    label: "Reject",
                    value: reject_value,
                    style: Some("danger"),
                },
            ],
        ),
    ]
}

/// Text of the notification sent back to the requester.
///
/// Approvals quote the original text when it travelled with the button;
/// rejections never include it.
#[must_use]
pub fn decision_notice(decision: Decision, approver_id: &str, text: Option<&str>) -> String {
    let mut notice = format!(
        "Your approval request has been {} by <@{approver_id}>.",
        decision.verb()
    );
    if decision == Decision::Approved {
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            for line in text.lines() {
                notice.push_str("\n> ");
                notice.push_str(line);
            }
        }
    }
    notice
}
