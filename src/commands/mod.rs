//! Command handlers for the CLI.

pub mod status;
pub mod watch;
