#![forbid(unsafe_code)]

//! Slack approval relay: request sign-off from a teammate through a slash
//! command, a modal, and direct-message Approve / Reject buttons.

pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod server;
pub mod slack;
pub mod state;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
