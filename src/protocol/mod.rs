//! Document protocol
//!
//! Line-oriented commands exposing the provider to other processes.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandData, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
