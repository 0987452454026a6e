//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keychain service name under which Slack credentials are stored.
pub const KEYRING_SERVICE: &str = "approval-relay";

/// Slack credentials.
///
/// Secrets are loaded at runtime via OS keychain or environment variables,
/// never from the TOML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SlackConfig {
    /// Signing secret used to verify inbound webhook requests (populated at runtime).
    #[serde(skip)]
    pub signing_secret: String,
    /// Bot user token used for `views.open` and `chat.postMessage` (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

fn default_http_port() -> u16 {
    3000
}

fn default_bind_address() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_slash_command() -> String {
    "/approval-test".into()
}

fn default_events_path() -> String {
    "/slack/events".into()
}

fn default_signature_max_age_seconds() -> u64 {
    300
}

/// Global configuration parsed from an optional `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Port the webhook receiver listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Interface the webhook receiver binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// Slash command that opens the approval modal.
    #[serde(default = "default_slash_command")]
    pub slash_command: String,
    /// Route that receives commands and interactions from Slack.
    #[serde(default = "default_events_path")]
    pub events_path: String,
    /// Maximum accepted clock skew for `X-Slack-Request-Timestamp`.
    #[serde(default = "default_signature_max_age_seconds")]
    pub signature_max_age_seconds: u64,
    /// Slack credentials.
    #[serde(default)]
    pub slack: SlackConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            slash_command: default_slash_command(),
            events_path: default_events_path(),
            signature_max_age_seconds: default_signature_max_age_seconds(),
            slack: SlackConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply process environment overrides (currently `PORT`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is set but not a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = env::var("PORT") {
            self.http_port = port
                .trim()
                .parse()
                .map_err(|err| AppError::Config(format!("invalid PORT value {port:?}: {err}")))?;
        }
        Ok(())
    }

    /// Load Slack credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `approval-relay` keyring service first, then falls back to
    /// `SLACK_SIGNING_SECRET` / `SLACK_BOT_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// the required secrets.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.signing_secret =
            load_credential("slack_signing_secret", "SLACK_SIGNING_SECRET").await?;
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        Ok(())
    }

    /// Socket address the webhook receiver binds to.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.http_port)
    }

    fn validate(&self) -> Result<()> {
        if !self.slash_command.starts_with('/') {
            return Err(AppError::Config(format!(
                "slash_command must start with '/': {}",
                self.slash_command
            )));
        }

        if !self.events_path.starts_with('/') {
            return Err(AppError::Config(format!(
                "events_path must start with '/': {}",
                self.events_path
            )));
        }

        if self.signature_max_age_seconds == 0 {
            return Err(AppError::Config(
                "signature_max_age_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    match env::var(env_key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))),
    }
}
