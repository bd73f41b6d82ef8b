//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod logging;
mod version;

pub use commands::{handle_command, Command};
pub use logging::*;
pub use version::display_version;
