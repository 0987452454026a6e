//! Action button value encoding.
//!
//! Slack hands a button's `value` back verbatim when it is clicked, so the
//! value is the only place a pending request lives. Values are a compact
//! JSON record; string escaping keeps arbitrary approval text intact.
//!
//! Values produced before the JSON record existed are still understood:
//! a bare user ID, or `{requester}:{text}` split at the first colon.

use serde::{Deserialize, Serialize};

use crate::models::approval::ApprovalRequest;
use crate::{AppError, Result};

/// Slack's limit on the length of a button `value`, in characters.
pub const MAX_VALUE_CHARS: usize = 2000;

/// Data carried through an action button round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ButtonPayload {
    /// Correlation identifier of the originating request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Slack user to notify once the approver decides.
    pub requester: String,
    /// Original approval text, carried only on the approve button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ButtonPayload {
    /// Payload for the "Approve" button: requester and approval text.
    #[must_use]
    pub fn approve(request: &ApprovalRequest) -> Self {
        Self {
            id: Some(request.id.clone()),
            requester: request.requester_id.clone(),
            text: Some(request.text.clone()),
        }
    }

    /// Payload for the "Reject" button: requester only.
    #[must_use]
    pub fn reject(request: &ApprovalRequest) -> Self {
        Self {
            id: Some(request.id.clone()),
            requester: request.requester_id.clone(),
            text: None,
        }
    }

    /// Serialize into a button value.
    ///
    /// If the value would exceed [`MAX_VALUE_CHARS`], the text is dropped
    /// so the requester can still be notified.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Codec` if the value is still too long without the
    /// text, or serialization fails.
    pub fn encode(&self) -> Result<String> {
        let value = to_json(self)?;
        if value.chars().count() <= MAX_VALUE_CHARS {
            return Ok(value);
        }

        let trimmed = Self {
            text: None,
            ..self.clone()
        };
        let value = to_json(&trimmed)?;
        if value.chars().count() <= MAX_VALUE_CHARS {
            Ok(value)
        } else {
            Err(AppError::Codec(format!(
                "button value exceeds {MAX_VALUE_CHARS} characters"
            )))
        }
    }

    /// Parse a button value received in a block action.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Codec` if the value is empty, is malformed JSON,
    /// or names no requester.
    pub fn decode(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Codec("button value is empty".into()));
        }

        let payload = if value.starts_with('{') {
            serde_json::from_str::<Self>(value)
                .map_err(|err| AppError::Codec(format!("malformed button value: {err}")))?
        } else {
            match value.split_once(':') {
                Some((requester, text)) => Self {
                    id: None,
                    requester: requester.to_owned(),
                    text: Some(text.to_owned()),
                },
                None => Self {
                    id: None,
                    requester: value.to_owned(),
                    text: None,
                },
            }
        };

        if payload.requester.trim().is_empty() {
            return Err(AppError::Codec("button value names no requester".into()));
        }

        Ok(payload)
    }
}

fn to_json(payload: &ButtonPayload) -> Result<String> {
    serde_json::to_string(payload)
        .map_err(|err| AppError::Codec(format!("failed to encode button value: {err}")))
}
