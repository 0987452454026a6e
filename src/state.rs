//! Shared application state handed to the receiver and handlers.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::report::{FailureReporter, TracingReporter};
use crate::slack::platform::ChatPlatform;
use crate::slack::signature::SignatureVerifier;

/// Dependencies of every handler, constructed once at startup.
pub struct AppState {
    /// Validated configuration with credentials loaded.
    pub config: Arc<GlobalConfig>,
    /// Outbound Slack calls.
    pub platform: Arc<dyn ChatPlatform>,
    /// Operator-facing failure sink.
    pub reporter: Arc<dyn FailureReporter>,
    /// Inbound request verifier keyed with the signing secret.
    pub verifier: SignatureVerifier,
}

impl AppState {
    /// Assemble state with the default [`TracingReporter`].
    #[must_use]
    pub fn new(config: GlobalConfig, platform: Arc<dyn ChatPlatform>) -> Self {
        let verifier = SignatureVerifier::new(
            config.slack.signing_secret.clone(),
            config.signature_max_age_seconds,
        );
        Self {
            config: Arc::new(config),
            platform,
            reporter: Arc::new(TracingReporter::new()),
            verifier,
        }
    }

    /// Replace the failure reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }
}
