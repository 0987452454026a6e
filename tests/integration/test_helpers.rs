//! Shared test helpers for handler-level integration tests.
//!
//! Provides a recording [`ChatPlatform`] fake and `AppState` construction so
//! individual test modules can focus on behaviour rather than boilerplate.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use approval_relay::config::GlobalConfig;
use approval_relay::slack::client::SlackMessage;
use approval_relay::slack::platform::ChatPlatform;
use approval_relay::state::AppState;
use approval_relay::{AppError, Result};
use slack_morphism::prelude::{SlackTriggerId, SlackView};
use tokio::sync::oneshot;

/// Signing secret used by every test state.
pub const TEST_SECRET: &str = "test-signing-secret";

/// One outbound call observed by [`RecordingPlatform`].
#[derive(Debug, Clone)]
pub enum PlatformCall {
    OpenModal {
        trigger_id: String,
        view: serde_json::Value,
        acked_before: bool,
    },
    PostMessage {
        channel: String,
        text: Option<String>,
        blocks: Option<serde_json::Value>,
        acked_before: bool,
    },
}

impl PlatformCall {
    pub fn acked_before(&self) -> bool {
        match self {
            Self::OpenModal { acked_before, .. } | Self::PostMessage { acked_before, .. } => {
                *acked_before
            }
        }
    }
}

/// Fake platform that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    fail: AtomicBool,
    ack_watch: Mutex<Option<oneshot::Receiver<()>>>,
    acked: AtomicBool,
}

impl RecordingPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A platform whose every call fails with `AppError::Slack`.
    pub fn failing() -> Arc<Self> {
        let platform = Self::default();
        platform.fail.store(true, Ordering::SeqCst);
        Arc::new(platform)
    }

    /// Watch `rx` so each recorded call notes whether the ack already fired.
    pub fn watch_ack(&self, rx: oneshot::Receiver<()>) {
        self.acked.store(false, Ordering::SeqCst);
        *self.ack_watch.lock().unwrap_or_else(PoisonError::into_inner) = Some(rx);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages posted so far as `(channel, text)` pairs.
    pub fn posted(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::PostMessage { channel, text, .. } => {
                    Some((channel, text.unwrap_or_default()))
                }
                PlatformCall::OpenModal { .. } => None,
            })
            .collect()
    }

    /// Poll until at least `count` calls were recorded or two seconds pass.
    pub async fn wait_for_calls(&self, count: usize) -> Vec<PlatformCall> {
        for _ in 0..100 {
            let calls = self.calls();
            if calls.len() >= count {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.calls()
    }

    fn observe_ack(&self) -> bool {
        let mut watched = self.ack_watch.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rx) = watched.as_mut() {
            if rx.try_recv().is_ok() {
                self.acked.store(true, Ordering::SeqCst);
            }
        }
        self.acked.load(Ordering::SeqCst)
    }

    fn record(&self, call: PlatformCall) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if self.fail.load(Ordering::SeqCst) {
            Err(AppError::Slack("simulated platform outage".into()))
        } else {
            Ok(())
        }
    }
}

impl ChatPlatform for RecordingPlatform {
    fn open_modal(
        &self,
        trigger_id: SlackTriggerId,
        view: SlackView,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let call = PlatformCall::OpenModal {
            trigger_id: trigger_id.0,
            view: serde_json::to_value(&view).expect("serialise view"),
            acked_before: self.observe_ack(),
        };
        Box::pin(async move { self.record(call) })
    }

    fn post_message(
        &self,
        message: SlackMessage,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let call = PlatformCall::PostMessage {
            channel: message.channel.to_string(),
            text: message.text,
            blocks: message
                .blocks
                .map(|b| serde_json::to_value(&b).expect("serialise blocks")),
            acked_before: self.observe_ack(),
        };
        Box::pin(async move { self.record(call) })
    }
}

/// Build a `GlobalConfig` with the test signing secret and a dummy bot token.
pub fn test_config() -> GlobalConfig {
    let mut config = GlobalConfig::from_toml_str("http_port = 0").expect("valid test config");
    config.slack.signing_secret = TEST_SECRET.to_owned();
    config.slack.bot_token = "xoxb-test".to_owned();
    config
}

/// Build an `AppState` around `platform`.
pub fn test_app_state(platform: Arc<RecordingPlatform>) -> AppState {
    AppState::new(test_config(), platform)
}
