//! Slack Web API client for the two calls the relay makes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use slack_morphism::prelude::{
    SlackApiChatPostMessageRequest, SlackApiToken, SlackApiTokenType, SlackApiTokenValue,
    SlackApiViewsOpenRequest, SlackBlock, SlackChannelId, SlackClient,
    SlackClientHyperHttpsConnector, SlackClientSession, SlackMessageContent, SlackTriggerId,
    SlackView,
};
use tracing::{debug, info};

use crate::slack::platform::ChatPlatform;
use crate::{config::SlackConfig, AppError, Result};

/// Message to be delivered to Slack via `chat.postMessage`.
#[derive(Debug, Clone)]
pub struct SlackMessage {
    pub channel: SlackChannelId,
    pub text: Option<String>,
    pub blocks: Option<Vec<SlackBlock>>,
}

impl SlackMessage {
    /// Create a plain-text message for a channel or user.
    pub fn plain(channel: SlackChannelId, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: Some(text.into()),
            blocks: None,
        }
    }

    /// Create a message with fallback text and Block Kit blocks.
    pub fn with_blocks(
        channel: SlackChannelId,
        text: impl Into<String>,
        blocks: Vec<SlackBlock>,
    ) -> Self {
        Self {
            channel,
            text: Some(text.into()),
            blocks: Some(blocks),
        }
    }

    fn into_request(self) -> SlackApiChatPostMessageRequest {
        let content = SlackMessageContent {
            text: self.text,
            blocks: self.blocks,
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        };

        SlackApiChatPostMessageRequest {
            channel: self.channel,
            content,
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: Some(true),
            parse: None,
            thread_ts: None,
            username: None,
            reply_broadcast: None,
            unfurl_links: None,
            unfurl_media: None,
        }
    }
}

/// Bot-token Slack client. Calls are made directly with no queue or retry.
pub struct SlackService {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
}

impl SlackService {
    /// Build the HTTPS client for the configured bot token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };

        info!("slack web api client ready");
        Ok(Self { client, bot_token })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    /// Open a Slack modal dialog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the API call fails.
    pub async fn open_modal(&self, trigger_id: SlackTriggerId, view: SlackView) -> Result<()> {
        let request = SlackApiViewsOpenRequest::new(trigger_id, view);
        self.http_session()
            .views_open(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to open modal: {err}")))?;
        debug!("modal opened");
        Ok(())
    }

    /// Post a message with `chat.postMessage`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the API call fails.
    pub async fn post_message(&self, message: SlackMessage) -> Result<()> {
        let channel = message.channel.to_string();
        let request = message.into_request();
        self.http_session()
            .chat_post_message(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to post message to {channel}: {err}")))?;
        debug!(channel, "sent slack message");
        Ok(())
    }
}

impl ChatPlatform for SlackService {
    fn open_modal(
        &self,
        trigger_id: SlackTriggerId,
        view: SlackView,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(SlackService::open_modal(self, trigger_id, view))
    }

    fn post_message(
        &self,
        message: SlackMessage,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(SlackService::post_message(self, message))
    }
}
