//! Outbound chat platform abstraction.
//!
//! The [`ChatPlatform`] trait is the only way handlers reach Slack. The
//! production implementation is [`SlackService`](crate::slack::client::SlackService);
//! tests supply a recording fake.

use std::future::Future;
use std::pin::Pin;

use slack_morphism::prelude::{SlackTriggerId, SlackView};

use crate::slack::client::SlackMessage;
use crate::Result;

/// The two outbound calls the approval workflow makes.
pub trait ChatPlatform: Send + Sync {
    /// Render a modal in response to a command or interaction trigger.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the `views.open` call fails.
    fn open_modal(
        &self,
        trigger_id: SlackTriggerId,
        view: SlackView,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Post a message to a channel or user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the `chat.postMessage` call fails.
    fn post_message(
        &self,
        message: SlackMessage,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
