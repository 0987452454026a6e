//! Approval request model.
//!
//! Requests are never stored. An [`ApprovalRequest`] lives only between the
//! modal submission and the post to the approver; after that its requester
//! and text survive solely inside the action button values.

use uuid::Uuid;

/// Outcome chosen by the approver, derived from the clicked button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Approver clicked "Approve".
    Approved,
    /// Approver clicked "Reject".
    Rejected,
}

impl Decision {
    /// Action identifier of the button that produces this decision.
    #[must_use]
    pub fn action_id(self) -> &'static str {
        match self {
            Self::Approved => "approve",
            Self::Rejected => "reject",
        }
    }

    /// Map a block-action identifier to a decision.
    #[must_use]
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            "approve" => Some(Self::Approved),
            "reject" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Past-tense verb used in the requester notification.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// An approval request assembled from a modal submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// Correlation identifier, used only in logs and button payloads.
    pub id: String,
    /// Slack user who submitted the modal.
    pub requester_id: String,
    /// Slack user selected to approve or reject.
    pub approver_id: String,
    /// Free-text description of what needs approval.
    pub text: String,
}

impl ApprovalRequest {
    /// Construct a new request with a fresh correlation identifier.
    #[must_use]
    pub fn new(requester_id: String, approver_id: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            requester_id,
            approver_id,
            text,
        }
    }
}
