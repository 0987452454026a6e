//! Inbound webhook payloads.
//!
//! Slack delivers slash commands as form fields, interactions as a form
//! field named `payload` holding JSON, and the endpoint-registration
//! challenge as a JSON body. Only the fields the relay reads are modelled;
//! everything else is ignored during deserialization.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{AppError, Result};

/// A classified, parsed webhook body.
#[derive(Debug, Clone)]
pub enum InboundRequest {
    /// Endpoint registration handshake; the challenge must be echoed back.
    UrlVerification {
        /// Opaque string to echo.
        challenge: String,
    },
    /// Periodic certificate check Slack sends to command URLs; answered
    /// with an empty 200 and never handled.
    SslCheck,
    /// A command or interaction to acknowledge and handle.
    Event(InboundEvent),
}

/// Events handled by the approval workflow.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// Slash command invocation.
    Command(CommandPayload),
    /// Modal submission, button click, or another interaction.
    Interaction(InteractionPayload),
}

/// Form fields of a slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPayload {
    /// Command name including the leading slash.
    pub command: String,
    /// Trigger used to open a modal in response.
    pub trigger_id: String,
    /// Invoking user.
    pub user_id: String,
    /// Free text typed after the command.
    pub text: String,
}

/// Slack user reference as found in interaction payloads.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    /// Slack user ID.
    pub id: String,
}

/// Interaction payload, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    /// A modal was submitted.
    ViewSubmission(ViewSubmission),
    /// A button (or other block element) was clicked.
    BlockActions(BlockActions),
    /// Any other interaction type; acknowledged and ignored.
    #[serde(other)]
    Other,
}

/// A submitted modal.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewSubmission {
    /// Submitting user.
    pub user: UserRef,
    /// The submitted view.
    pub view: SubmittedView,
}

/// The view portion of a submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmittedView {
    /// Callback identifier set when the modal was opened.
    #[serde(default)]
    pub callback_id: String,
    /// Input values keyed by block ID, then action ID.
    #[serde(default)]
    pub state: ViewState,
}

/// Submitted input values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewState {
    /// `block_id` → `action_id` → value.
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, StateValue>>,
}

/// A single input element's submitted value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateValue {
    /// Set by `users_select` elements.
    #[serde(default)]
    pub selected_user: Option<String>,
    /// Set by `plain_text_input` elements.
    #[serde(default)]
    pub value: Option<String>,
}

impl ViewSubmission {
    fn state_value(&self, block_id: &str, action_id: &str) -> Option<&StateValue> {
        self.view
            .state
            .values
            .get(block_id)
            .and_then(|block| block.get(action_id))
    }

    /// User picked in a `users_select` input.
    #[must_use]
    pub fn selected_user(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.state_value(block_id, action_id)
            .and_then(|v| v.selected_user.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Text typed into a `plain_text_input`.
    #[must_use]
    pub fn input_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.state_value(block_id, action_id)
            .and_then(|v| v.value.as_deref())
    }
}

/// A block-actions interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockActions {
    /// Clicking user.
    pub user: UserRef,
    /// Actions taken; Slack sends one per click.
    #[serde(default)]
    pub actions: Vec<ActionInfo>,
}

/// One action within a block-actions interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionInfo {
    /// Identifier of the clicked element.
    pub action_id: String,
    /// Opaque value attached to the element.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Deserialize)]
struct JsonEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    challenge: Option<String>,
}

impl InboundRequest {
    /// Classify and parse a raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Payload` if the body matches no known shape or a
    /// required field is missing.
    pub fn parse(content_type: &str, body: &[u8]) -> Result<Self> {
        if content_type.starts_with("application/json") {
            return parse_json(body);
        }

        let fields: HashMap<String, String> = url::form_urlencoded::parse(body)
            .into_owned()
            .collect();

        if fields.contains_key("ssl_check") {
            return Ok(Self::SslCheck);
        }

        if let Some(payload) = fields.get("payload") {
            let interaction: InteractionPayload = serde_json::from_str(payload)
                .map_err(|err| AppError::Payload(format!("invalid interaction payload: {err}")))?;
            return Ok(Self::Event(InboundEvent::Interaction(interaction)));
        }

        if fields.contains_key("command") {
            return CommandPayload::from_fields(&fields)
                .map(|cmd| Self::Event(InboundEvent::Command(cmd)));
        }

        Err(AppError::Payload(
            "body is neither a command nor an interaction".into(),
        ))
    }
}

fn parse_json(body: &[u8]) -> Result<InboundRequest> {
    let envelope: JsonEnvelope = serde_json::from_slice(body)
        .map_err(|err| AppError::Payload(format!("invalid json body: {err}")))?;
    match (envelope.kind.as_str(), envelope.challenge) {
        ("url_verification", Some(challenge)) => Ok(InboundRequest::UrlVerification { challenge }),
        (kind, _) => Err(AppError::Payload(format!(
            "unsupported json event type: {kind}"
        ))),
    }
}

impl CommandPayload {
    fn from_fields(fields: &HashMap<String, String>) -> Result<Self> {
        let required = |name: &str| {
            fields
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| AppError::Payload(format!("command is missing {name}")))
        };
        Ok(Self {
            command: required("command")?,
            trigger_id: required("trigger_id")?,
            user_id: required("user_id")?,
            text: fields.get("text").cloned().unwrap_or_default(),
        })
    }
}

impl InboundEvent {
    /// Reporting category of this event.
    #[must_use]
    pub fn kind(&self) -> crate::report::EventKind {
        use crate::report::EventKind;
        match self {
            Self::Command(_) => EventKind::Command,
            Self::Interaction(InteractionPayload::ViewSubmission(_)) => EventKind::ViewSubmission,
            Self::Interaction(InteractionPayload::BlockActions(_)) => EventKind::BlockAction,
            Self::Interaction(InteractionPayload::Other) => EventKind::Request,
        }
    }
}
