//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing, validation, or credential loading failure.
    Config(String),
    /// Slack Web API failure on an outbound call.
    Slack(String),
    /// Inbound request failed signature or timestamp verification.
    Signature(String),
    /// Inbound event is malformed or missing a required field.
    Payload(String),
    /// Action button value could not be decoded.
    Codec(String),
    /// Socket or other I/O failure.
    Io(String),
}

impl AppError {
    /// Short, stable label for the error kind, used as a reporting key.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Slack(_) => "slack",
            Self::Signature(_) => "signature",
            Self::Payload(_) => "payload",
            Self::Codec(_) => "codec",
            Self::Io(_) => "io",
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Slack(msg) => write!(f, "slack: {msg}"),
            Self::Signature(msg) => write!(f, "signature: {msg}"),
            Self::Payload(msg) => write!(f, "payload: {msg}"),
            Self::Codec(msg) => write!(f, "codec: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
