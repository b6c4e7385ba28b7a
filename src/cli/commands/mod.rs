//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod fetch;

pub use ask::run_ask;
pub use chat::{parse_command, run_chat, ChatCommand, SUGGESTED_QUESTIONS};
pub use config::run_config;
pub use doctor::run_doctor;
pub use fetch::run_fetch;
