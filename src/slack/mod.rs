//! Slack bridge layer modules.

pub mod ack;
pub mod blocks;
pub mod client;
pub mod events;
pub mod handlers;
pub mod platform;
pub mod signature;
